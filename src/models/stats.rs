//! Run statistics and failure records.

use serde::Serialize;

/// Pipeline stage in which a document failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extraction,
    Classification,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extraction => "extraction",
            Self::Classification => "classification",
        }
    }
}

/// Why a document produced no classification.
#[derive(Debug, Clone)]
pub struct FailureRecord {
    pub filename: String,
    pub stage: Stage,
    pub reason: String,
}

/// Counters for one classification run.
///
/// Every scanned file lands in exactly one of `processed` or `failed`,
/// so the two always sum to `total_files` once a run completes.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RunStatistics {
    pub total_files: usize,
    pub processed: usize,
    pub failed: usize,
}

impl RunStatistics {
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            processed: 0,
            failed: 0,
        }
    }

    /// Percentage of scanned files that produced a classification.
    pub fn success_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            self.processed as f64 / self.total_files as f64 * 100.0
        }
    }

    pub fn is_complete(&self) -> bool {
        self.processed + self.failed == self.total_files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_rate_handles_empty_runs() {
        assert_eq!(RunStatistics::new(0).success_rate(), 0.0);
    }

    #[test]
    fn success_rate_is_a_percentage() {
        let stats = RunStatistics {
            total_files: 7,
            processed: 5,
            failed: 2,
        };
        assert!((stats.success_rate() - 71.428).abs() < 0.01);
        assert!(stats.is_complete());
    }

    #[test]
    fn stage_names() {
        assert_eq!(Stage::Extraction.as_str(), "extraction");
        assert_eq!(Stage::Classification.as_str(), "classification");
    }
}
