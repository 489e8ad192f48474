//! The `classify` command: extract, classify in batches, export.

use console::style;

use crate::classify::GeminiProvider;
use crate::config::{self, ClassifierConfig};
use crate::services::ClassificationPipeline;

use super::helpers;

pub async fn cmd_classify(
    folder: &str,
    batch_size: usize,
    output: &str,
    max_pages: usize,
    max_chars: usize,
    model: &str,
) -> anyhow::Result<()> {
    let folder = config::resolve_path(folder);
    let config = ClassifierConfig {
        batch_size,
        max_pages,
        max_chars,
        model: model.to_string(),
        output_dir: config::resolve_path(output),
        ..ClassifierConfig::from_env()
    };
    config.validate()?;

    let api_key = config::api_key_from_env()?;
    let provider = GeminiProvider::new(api_key)?.with_model(model);

    println!(
        "{} {} (batches of {})",
        style("Classifying PDFs in").bold(),
        folder.display(),
        config.batch_size
    );

    let pipeline = ClassificationPipeline::new(config, provider).with_progress(true);
    let outcome = pipeline.run(&folder).await?;

    helpers::print_summary(&outcome);
    Ok(())
}
