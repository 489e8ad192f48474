//! The `organize` command: classify (or reuse results), then move files
//! into per-topic folders.

use std::path::{Path, PathBuf};

use console::style;

use crate::classify::GeminiProvider;
use crate::config::{self, ClassifierConfig};
use crate::export;
use crate::services::{organize_by_topic, ClassificationPipeline};

use super::helpers;

pub struct OrganizeArgs {
    pub folder: String,
    pub destination: Option<String>,
    pub from_results: Option<String>,
    pub dry_run: bool,
    pub batch_size: usize,
    pub output: String,
    pub max_pages: usize,
    pub max_chars: usize,
    pub model: String,
}

pub async fn cmd_organize(args: OrganizeArgs) -> anyhow::Result<()> {
    let folder = config::resolve_path(&args.folder);
    let destination = match &args.destination {
        Some(raw) => config::resolve_path(raw),
        None => default_destination(&folder),
    };

    let records = match &args.from_results {
        Some(raw) => {
            let path = config::resolve_path(raw);
            let file = export::read_results_file(&path)?;
            println!(
                "Reusing {} classifications from {}",
                file.resultados.len(),
                path.display()
            );
            file.resultados
        }
        None => {
            let config = ClassifierConfig {
                batch_size: args.batch_size,
                max_pages: args.max_pages,
                max_chars: args.max_chars,
                model: args.model.clone(),
                output_dir: config::resolve_path(&args.output),
                ..ClassifierConfig::from_env()
            };
            config.validate()?;

            let api_key = config::api_key_from_env()?;
            let provider = GeminiProvider::new(api_key)?.with_model(args.model.as_str());

            println!(
                "{} {} (batches of {})",
                style("Classifying PDFs in").bold(),
                folder.display(),
                config.batch_size
            );
            let pipeline = ClassificationPipeline::new(config, provider).with_progress(true);
            let outcome = pipeline.run(&folder).await?;
            helpers::print_summary(&outcome);
            outcome.records
        }
    };

    if args.dry_run {
        println!();
        println!("{}", style("Dry run: planning moves only").yellow());
    }
    let stats = organize_by_topic(&records, &folder, &destination, args.dry_run)?;

    println!();
    println!("{}", style("Organization summary").bold());
    println!("  Organized:       {}", style(stats.organized).green());
    println!("  Unclassified:    {}", stats.unclassified);
    println!("  Folders created: {}", stats.folders_created);
    println!("  Destination:     {}", destination.display());
    Ok(())
}

/// `<folder>_organizados` next to the source folder.
fn default_destination(folder: &Path) -> PathBuf {
    let name = folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "documentos".to_string());
    folder.with_file_name(format!("{name}_organizados"))
}
