//! clasifica - batch PDF topic classification.
//!
//! A tool for classifying folders of PDF documents into a three-level
//! topic hierarchy using the Google Gemini API.

use std::fs::OpenOptions;
use std::sync::Arc;

use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use clasificador::cli;

/// Run log mirrored next to the working directory, append-only.
const LOG_FILE: &str = "clasificador.log";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "clasificador=info"
    } else {
        "clasificador=warn"
    };
    let console_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // The log file always captures info and up, regardless of the
    // console filter.
    let file_layer = match OpenOptions::new().append(true).create(true).open(LOG_FILE) {
        Ok(file) => Some(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .with_filter(LevelFilter::INFO),
        ),
        Err(error) => {
            eprintln!("warning: could not open {LOG_FILE}: {error}");
            None
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .with(file_layer)
        .init();

    // Run CLI
    cli::run().await
}
