//! Service layer for classification runs.
//!
//! Domain logic lives here, separated from CLI concerns, so the
//! pipeline can be driven from tests exactly like from the binary.

pub mod organize;
pub mod pipeline;

pub use organize::{organize_by_topic, OrganizeStats, UNCLASSIFIED_DIR};
pub use pipeline::{scan_folder, ClassificationPipeline, RunOutcome};
