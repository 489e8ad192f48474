//! Accumulates per-document outcomes into run results.

use chrono::Utc;
use tracing::{info, warn};

use crate::models::{
    ClassificationRecord, Document, FailureRecord, RunStatistics, Stage, TopicClassification,
};

/// Collects successes and failures as a run advances.
///
/// Records keep the order in which documents were pushed. Timestamps are
/// attached here, when a result is aggregated, not when the API call
/// happened. Once every scanned file has been pushed, successes and
/// failures together account for the whole folder.
#[derive(Debug)]
pub struct ResultAggregator {
    records: Vec<ClassificationRecord>,
    failures: Vec<FailureRecord>,
    stats: RunStatistics,
}

impl ResultAggregator {
    pub fn new(total_files: usize) -> Self {
        Self {
            records: Vec::new(),
            failures: Vec::new(),
            stats: RunStatistics::new(total_files),
        }
    }

    /// Record a classified document. The file name and index come from
    /// the document itself, never from what the model echoed back.
    pub fn push_success(&mut self, document: &Document, topic: TopicClassification) {
        info!(
            "Classified {} as {} > {} > {}",
            document.filename, topic.general_topic, topic.subtopic, topic.specific_topic
        );
        self.stats.processed += 1;
        self.records.push(ClassificationRecord {
            index: document.index,
            filename: document.filename.clone(),
            general_topic: topic.general_topic,
            subtopic: topic.subtopic,
            specific_topic: topic.specific_topic,
            confidence: topic.confidence,
            keywords: topic.keywords,
            timestamp: Utc::now(),
        });
    }

    /// Record a document that produced no classification.
    pub fn push_failure(&mut self, filename: &str, stage: Stage, reason: impl Into<String>) {
        let reason = reason.into();
        warn!("{} failed during {}: {}", filename, stage.as_str(), reason);
        self.stats.failed += 1;
        self.failures.push(FailureRecord {
            filename: filename.to_string(),
            stage,
            reason,
        });
    }

    pub fn statistics(&self) -> RunStatistics {
        self.stats
    }

    /// Consume the aggregator once every scanned file has been pushed.
    pub fn finish(self) -> (Vec<ClassificationRecord>, Vec<FailureRecord>, RunStatistics) {
        debug_assert!(
            self.stats.is_complete(),
            "aggregated {} successes and {} failures for {} files",
            self.stats.processed,
            self.stats.failed,
            self.stats.total_files
        );
        (self.records, self.failures, self.stats)
    }
}
