//! The `results` command: list previous classification exports.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use console::style;

use crate::config;
use crate::export::read_results_file;
use crate::models::ClassificationRecord;

use super::helpers;

pub fn cmd_results(output: &str) -> anyhow::Result<()> {
    let dir = config::resolve_path(output);
    if !dir.is_dir() {
        println!("No results directory at {}", dir.display());
        return Ok(());
    }

    let mut paths: Vec<_> = fs::read_dir(&dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_results_file(path))
        .collect();
    paths.sort();

    if paths.is_empty() {
        println!("No result files in {}", dir.display());
        return Ok(());
    }

    println!(
        "{}",
        style(format!("Result files in {}", dir.display())).bold()
    );
    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match read_results_file(&path) {
            Ok(file) => {
                println!(
                    "  {}  {} records, {:.1}% success  {}",
                    style(name).cyan(),
                    file.resultados.len(),
                    file.estadisticas.success_rate,
                    helpers::truncate(&summarize_topics(&file.resultados), 60)
                );
            }
            Err(error) => {
                println!(
                    "  {}  {}",
                    name,
                    style(format!("unreadable: {error:#}")).red()
                );
            }
        }
    }
    Ok(())
}

/// Timestamped exports look like `clasificacion_20250101_120000.json`.
fn is_results_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("clasificacion_") && n.ends_with(".json"))
}

/// Top general topics as `Tema (n)`, most frequent first.
fn summarize_topics(records: &[ClassificationRecord]) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.general_topic.as_str()).or_default() += 1;
    }
    let mut topics: Vec<_> = counts.into_iter().collect();
    topics.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    topics
        .into_iter()
        .take(3)
        .map(|(topic, count)| format!("{topic} ({count})"))
        .collect::<Vec<_>>()
        .join(", ")
}
