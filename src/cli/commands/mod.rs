//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod classify;
mod helpers;
mod organize;
mod results;

use clap::{Parser, Subcommand};

use crate::config;

#[derive(Parser)]
#[command(name = "clasifica")]
#[command(about = "Classify PDF collections into a three-level topic hierarchy with Gemini")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every PDF in a folder and export JSON + CSV results
    Classify {
        /// Folder containing the PDFs
        folder: String,

        /// Documents sent per API call
        #[arg(short, long, default_value_t = config::DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Directory for result files
        #[arg(short, long, default_value = config::DEFAULT_OUTPUT_DIR)]
        output: String,

        /// Maximum pages read per PDF
        #[arg(long, default_value_t = config::DEFAULT_MAX_PAGES)]
        max_pages: usize,

        /// Maximum characters of text kept per PDF
        #[arg(long, default_value_t = config::DEFAULT_MAX_CHARS)]
        max_chars: usize,

        /// Gemini model to use
        #[arg(long, env = "CLASIFICA_MODEL", default_value = config::DEFAULT_MODEL)]
        model: String,
    },

    /// Classify PDFs, then move them into folders named after their topic
    Organize {
        /// Folder containing the PDFs
        folder: String,

        /// Destination folder (defaults to `<folder>_organizados`)
        #[arg(long)]
        destination: Option<String>,

        /// Reuse a previous JSON results file instead of classifying again
        #[arg(long)]
        from_results: Option<String>,

        /// Plan the moves without touching any file
        #[arg(long)]
        dry_run: bool,

        /// Documents sent per API call
        #[arg(short, long, default_value_t = config::DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Directory for result files
        #[arg(short, long, default_value = config::DEFAULT_OUTPUT_DIR)]
        output: String,

        /// Maximum pages read per PDF
        #[arg(long, default_value_t = config::DEFAULT_MAX_PAGES)]
        max_pages: usize,

        /// Maximum characters of text kept per PDF
        #[arg(long, default_value_t = config::DEFAULT_MAX_CHARS)]
        max_chars: usize,

        /// Gemini model to use
        #[arg(long, env = "CLASIFICA_MODEL", default_value = config::DEFAULT_MODEL)]
        model: String,
    },

    /// List previous result files in the output directory
    Results {
        /// Directory where result files live
        #[arg(short, long, default_value = config::DEFAULT_OUTPUT_DIR)]
        output: String,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Classify {
            folder,
            batch_size,
            output,
            max_pages,
            max_chars,
            model,
        } => {
            classify::cmd_classify(&folder, batch_size, &output, max_pages, max_chars, &model)
                .await
        }
        Commands::Organize {
            folder,
            destination,
            from_results,
            dry_run,
            batch_size,
            output,
            max_pages,
            max_chars,
            model,
        } => {
            organize::cmd_organize(organize::OrganizeArgs {
                folder,
                destination,
                from_results,
                dry_run,
                batch_size,
                output,
                max_pages,
                max_chars,
                model,
            })
            .await
        }
        Commands::Results { output } => results::cmd_results(&output),
    }
}
