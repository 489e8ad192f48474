//! Result export to JSON and CSV.
//!
//! Both formats carry the same records in the same order. The JSON file
//! wraps them with run statistics; the CSV is a flat table for
//! spreadsheet use. A failure in one format never blocks the other.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::models::{ClassificationRecord, RunStatistics};

const CSV_FIELDS: [&str; 8] = [
    "documento",
    "archivo",
    "tema_general",
    "subtema",
    "tema_especifico",
    "confianza",
    "palabras_clave",
    "timestamp",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Statistics block embedded in the JSON export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportStatistics {
    pub total_files: usize,
    pub processed: usize,
    pub failed: usize,
    pub success_rate: f64,
}

impl From<RunStatistics> for ExportStatistics {
    fn from(stats: RunStatistics) -> Self {
        Self {
            total_files: stats.total_files,
            processed: stats.processed,
            failed: stats.failed,
            success_rate: stats.success_rate(),
        }
    }
}

/// Shape of an exported JSON results file, for reading back.
#[derive(Debug, Deserialize)]
pub struct ResultsFile {
    pub generado: DateTime<Utc>,
    pub estadisticas: ExportStatistics,
    pub resultados: Vec<ClassificationRecord>,
}

#[derive(Serialize)]
struct ResultsDocument<'a> {
    generado: DateTime<Utc>,
    estadisticas: ExportStatistics,
    resultados: &'a [ClassificationRecord],
}

/// Per-format outcome of one export pass.
#[derive(Debug)]
pub struct ExportOutcome {
    pub json: Result<PathBuf, ExportError>,
    pub csv: Result<PathBuf, ExportError>,
}

/// Writes result files under a fixed output directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    output_dir: PathBuf,
}

impl Exporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write both formats as `clasificacion_<timestamp>.{json,csv}`.
    ///
    /// Each format is attempted even if the other fails; per-format
    /// errors are logged here and also returned for the caller to show.
    pub fn export(&self, records: &[ClassificationRecord], stats: RunStatistics) -> ExportOutcome {
        if let Err(e) = fs::create_dir_all(&self.output_dir) {
            error!(
                "Cannot create output directory {}: {}",
                self.output_dir.display(),
                e
            );
            // io::Error is not Clone; rebuild it for the second format.
            let twin = io::Error::new(e.kind(), e.to_string());
            return ExportOutcome {
                json: Err(ExportError::CreateDir {
                    path: self.output_dir.clone(),
                    source: e,
                }),
                csv: Err(ExportError::CreateDir {
                    path: self.output_dir.clone(),
                    source: twin,
                }),
            };
        }

        let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        let json_path = self.output_dir.join(format!("clasificacion_{stamp}.json"));
        let csv_path = self.output_dir.join(format!("clasificacion_{stamp}.csv"));

        let json = match write_json(&json_path, records, stats) {
            Ok(()) => {
                info!(
                    "Wrote {} records to {}",
                    records.len(),
                    json_path.display()
                );
                Ok(json_path)
            }
            Err(e) => {
                error!("JSON export failed: {e}");
                Err(e)
            }
        };

        let csv = match write_csv(&csv_path, records) {
            Ok(()) => {
                info!("Wrote CSV table to {}", csv_path.display());
                Ok(csv_path)
            }
            Err(e) => {
                error!("CSV export failed: {e}");
                Err(e)
            }
        };

        ExportOutcome { json, csv }
    }
}

fn write_json(
    path: &Path,
    records: &[ClassificationRecord],
    stats: RunStatistics,
) -> Result<(), ExportError> {
    let document = ResultsDocument {
        generado: Utc::now(),
        estadisticas: stats.into(),
        resultados: records,
    };
    let body = serde_json::to_string_pretty(&document)?;
    fs::write(path, body).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn write_csv(path: &Path, records: &[ClassificationRecord]) -> Result<(), ExportError> {
    let mut out = String::new();
    out.push_str(&CSV_FIELDS.join(","));
    out.push('\n');
    for record in records {
        let row = [
            record.index.to_string(),
            escape_csv(&record.filename),
            escape_csv(&record.general_topic),
            escape_csv(&record.subtopic),
            escape_csv(&record.specific_topic),
            record.confidence.as_str().to_string(),
            escape_csv(&record.keywords.join(", ")),
            record.timestamp.to_rfc3339(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    fs::write(path, out).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Read a previously exported JSON results file.
pub fn read_results_file(path: &Path) -> anyhow::Result<ResultsFile> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file = serde_json::from_str(&body)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(file)
}
