//! Data models for the classification pipeline.

mod record;
mod stats;

pub use record::{ClassificationRecord, Confidence, Document, TopicClassification};
pub use stats::{FailureRecord, RunStatistics, Stage};
