//! Moves classified PDFs into per-topic folders.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{info, warn};

use crate::models::ClassificationRecord;

use super::pipeline::{file_name, scan_folder};

/// Folder receiving files that never got a classification.
pub const UNCLASSIFIED_DIR: &str = "no_clasificados";

/// Counters for one organize pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrganizeStats {
    pub organized: usize,
    pub unclassified: usize,
    pub folders_created: usize,
}

/// Move classified files into `<destination>/<tema_general>/` and any
/// remaining PDF into `<destination>/no_clasificados/`.
///
/// Classified names come from `records`; every other PDF still in the
/// source folder counts as unclassified. With `dry_run` the moves are
/// only logged and the stats reflect what would happen.
pub fn organize_by_topic(
    records: &[ClassificationRecord],
    source: &Path,
    destination: &Path,
    dry_run: bool,
) -> anyhow::Result<OrganizeStats> {
    let scanned = scan_folder(source)?;
    let by_filename: HashMap<&str, &ClassificationRecord> = records
        .iter()
        .map(|record| (record.filename.as_str(), record))
        .collect();

    let mut stats = OrganizeStats::default();
    let mut created: BTreeSet<PathBuf> = BTreeSet::new();

    for path in &scanned {
        let name = file_name(path);
        let (target_dir, classified) = match by_filename.get(name.as_str()) {
            Some(record) => (
                destination.join(sanitize_folder_name(&record.general_topic)),
                true,
            ),
            None => (destination.join(UNCLASSIFIED_DIR), false),
        };

        if !target_dir.exists() && created.insert(target_dir.clone()) {
            stats.folders_created += 1;
            if !dry_run {
                fs::create_dir_all(&target_dir)
                    .with_context(|| format!("failed to create {}", target_dir.display()))?;
            }
        }

        let target = target_dir.join(&name);
        if dry_run {
            info!("Would move {} -> {}", path.display(), target.display());
            if classified {
                stats.organized += 1;
            } else {
                stats.unclassified += 1;
            }
            continue;
        }

        match move_file(path, &target) {
            Ok(()) => {
                info!("Moved {} -> {}", name, target.display());
                if classified {
                    stats.organized += 1;
                } else {
                    stats.unclassified += 1;
                }
            }
            Err(error) => {
                warn!("Failed to move {}: {}", path.display(), error);
            }
        }
    }

    Ok(stats)
}

/// Rename, falling back to copy plus remove across filesystems.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}

/// Make a topic usable as a folder name. Anything path-hostile becomes
/// an underscore; an empty result falls back to `sin_tema`.
fn sanitize_folder_name(topic: &str) -> String {
    let cleaned: String = topic
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() {
        "sin_tema".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Confidence;
    use chrono::Utc;
    use tempfile::TempDir;

    fn record(filename: &str, general: &str) -> ClassificationRecord {
        ClassificationRecord {
            index: 1,
            filename: filename.to_string(),
            general_topic: general.to_string(),
            subtopic: "Subtema".to_string(),
            specific_topic: "Específico".to_string(),
            confidence: Confidence::Alta,
            keywords: vec![],
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn sanitize_keeps_letters_and_replaces_separators() {
        assert_eq!(sanitize_folder_name("Historia"), "Historia");
        assert_eq!(sanitize_folder_name("Ciencia/Física"), "Ciencia_Física");
        assert_eq!(sanitize_folder_name("a: b"), "a_ b");
        assert_eq!(sanitize_folder_name("  . "), "_");
        assert_eq!(sanitize_folder_name(" . . "), "_ _");
        assert_eq!(sanitize_folder_name(""), "sin_tema");
    }

    #[test]
    fn classified_files_move_into_topic_folders() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("docs");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("a.pdf"), b"pdf a").unwrap();
        fs::write(source.join("b.pdf"), b"pdf b").unwrap();
        fs::write(source.join("sin_clasificar.pdf"), b"pdf c").unwrap();

        let records = vec![record("a.pdf", "Historia"), record("b.pdf", "Ciencias")];
        let destination = dir.path().join("organizados");
        let stats = organize_by_topic(&records, &source, &destination, false).unwrap();

        assert_eq!(stats.organized, 2);
        assert_eq!(stats.unclassified, 1);
        assert_eq!(stats.folders_created, 3);
        assert!(destination.join("Historia").join("a.pdf").is_file());
        assert!(destination.join("Ciencias").join("b.pdf").is_file());
        assert!(destination
            .join(UNCLASSIFIED_DIR)
            .join("sin_clasificar.pdf")
            .is_file());
        assert!(!source.join("a.pdf").exists());
    }

    #[test]
    fn dry_run_counts_without_touching_files() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("docs");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("a.pdf"), b"pdf a").unwrap();

        let records = vec![record("a.pdf", "Historia")];
        let destination = dir.path().join("organizados");
        let stats = organize_by_topic(&records, &source, &destination, true).unwrap();

        assert_eq!(stats.organized, 1);
        assert_eq!(stats.folders_created, 1);
        assert!(source.join("a.pdf").is_file());
        assert!(!destination.exists());
    }

    #[test]
    fn repeated_topics_share_one_folder() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("docs");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("a.pdf"), b"pdf a").unwrap();
        fs::write(source.join("b.pdf"), b"pdf b").unwrap();

        let records = vec![record("a.pdf", "Historia"), record("b.pdf", "Historia")];
        let destination = dir.path().join("organizados");
        let stats = organize_by_topic(&records, &source, &destination, false).unwrap();

        assert_eq!(stats.organized, 2);
        assert_eq!(stats.folders_created, 1);
    }
}
