//! End-to-end classification pipeline.
//!
//! Extraction, batching, classification, aggregation, and export run
//! sequentially. Batches are paced with a configurable delay so a run
//! over a large folder stays under API quotas.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::aggregate::ResultAggregator;
use crate::batch::{batch_count, batches};
use crate::classify::{BatchClassifier, LlmProvider};
use crate::config::{ClassifierConfig, ConfigError};
use crate::export::{ExportOutcome, Exporter};
use crate::extract::TextExtractor;
use crate::models::{ClassificationRecord, Document, FailureRecord, RunStatistics, Stage};

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub statistics: RunStatistics,
    pub records: Vec<ClassificationRecord>,
    pub failures: Vec<FailureRecord>,
    /// Export results, when there was anything to export.
    pub export: Option<ExportOutcome>,
}

/// Sequential classification pipeline over a folder of PDFs.
///
/// Per-document problems become failure records; the only fatal error
/// is a folder that cannot be scanned at all.
pub struct ClassificationPipeline<P> {
    config: ClassifierConfig,
    extractor: TextExtractor,
    classifier: BatchClassifier<P>,
    show_progress: bool,
}

impl<P: LlmProvider> ClassificationPipeline<P> {
    pub fn new(config: ClassifierConfig, provider: P) -> Self {
        let extractor = TextExtractor::new()
            .with_max_pages(config.max_pages)
            .with_max_chars(config.max_chars);
        let classifier = BatchClassifier::new(provider, config.retry.clone());
        Self {
            config,
            extractor,
            classifier,
            show_progress: false,
        }
    }

    /// Draw a progress bar while batches are classified.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Classify every PDF in `folder` and export the results.
    pub async fn run(&self, folder: &Path) -> Result<RunOutcome, ConfigError> {
        let files = scan_folder(folder)?;
        info!("Found {} PDF files in {}", files.len(), folder.display());

        let mut aggregator = ResultAggregator::new(files.len());
        if files.is_empty() {
            warn!("No PDF files found in {}", folder.display());
            let (records, failures, statistics) = aggregator.finish();
            return Ok(RunOutcome {
                statistics,
                records,
                failures,
                export: None,
            });
        }

        // Indexes follow scan order, so exported indexes still reflect
        // folder positions when some files fail extraction.
        let mut documents = Vec::new();
        for (position, path) in files.iter().enumerate() {
            let filename = file_name(path);
            match self.extractor.extract(path) {
                Ok(extracted) => {
                    info!(
                        "Extracted {} chars from {} ({} pages)",
                        extracted.text.chars().count(),
                        filename,
                        extracted.pages_read
                    );
                    documents.push(Document {
                        index: position + 1,
                        path: path.clone(),
                        filename,
                        text: extracted.text,
                        pages_read: extracted.pages_read,
                    });
                }
                Err(error) => {
                    aggregator.push_failure(&filename, Stage::Extraction, error.to_string());
                }
            }
        }

        let total_batches = batch_count(documents.len(), self.config.batch_size);
        let progress = self.progress_bar(total_batches as u64);
        for batch in batches(&documents, self.config.batch_size) {
            progress.set_message(format!("batch {}/{}", batch.number, total_batches));
            info!(
                "Classifying batch {}/{} ({} documents)",
                batch.number,
                total_batches,
                batch.len()
            );

            let results = self.classifier.classify_batch(&batch).await;
            for (document, result) in batch.documents.iter().zip(results) {
                match result {
                    Ok(topic) => aggregator.push_success(document, topic),
                    Err(error) => aggregator.push_failure(
                        &document.filename,
                        Stage::Classification,
                        error.to_string(),
                    ),
                }
            }
            progress.inc(1);

            if batch.number < total_batches && self.config.batch_delay > Duration::ZERO {
                tokio::time::sleep(self.config.batch_delay).await;
            }
        }
        progress.finish_and_clear();

        let (records, failures, statistics) = aggregator.finish();

        let export = if records.is_empty() {
            warn!("No results to export");
            None
        } else {
            Some(Exporter::new(self.config.output_dir.clone()).export(&records, statistics))
        };

        Ok(RunOutcome {
            statistics,
            records,
            failures,
            export,
        })
    }

    fn progress_bar(&self, total: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
                .unwrap()
                .progress_chars("█▓░"),
        );
        pb
    }
}

/// Non-recursive scan for `*.pdf` (case-insensitive), sorted by name so
/// runs over the same folder are deterministic.
pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    if !folder.is_dir() {
        return Err(ConfigError::FolderNotFound(folder.to_path_buf()));
    }
    let entries =
        fs::read_dir(folder).map_err(|_| ConfigError::FolderNotFound(folder.to_path_buf()))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_pdf_extension(path))
        .collect();
    files.sort();
    Ok(files)
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
