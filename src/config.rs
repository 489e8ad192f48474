//! Configuration for classification runs.
//!
//! All tuning knobs live on [`ClassifierConfig`] so the pipeline never
//! reads the environment directly. The API key is the one exception to
//! the defaults-plus-flags flow: it only ever comes from the environment
//! (or an `.env` file loaded at startup).

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::classify::{get_delay_from_env, RetryPolicy};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_MAX_PAGES: usize = 20;
pub const DEFAULT_MAX_CHARS: usize = 15_000;
pub const DEFAULT_OUTPUT_DIR: &str = "results";
const DEFAULT_BATCH_DELAY_MS: u64 = 2_000;

/// Environment variable holding the Gemini API key.
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
/// Overrides the pause between consecutive batches, in milliseconds.
pub const BATCH_DELAY_VAR: &str = "CLASIFICA_BATCH_DELAY_MS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GOOGLE_API_KEY is not set; add it to the environment or an .env file")]
    MissingApiKey,
    #[error("folder not found or not a directory: {}", .0.display())]
    FolderNotFound(PathBuf),
    #[error("batch size must be at least 1")]
    InvalidBatchSize,
    #[error("{0} must be at least 1")]
    InvalidLimit(&'static str),
}

/// Settings for one classification run.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Number of documents grouped into a single API call.
    pub batch_size: usize,
    /// Maximum pages read per PDF.
    pub max_pages: usize,
    /// Maximum characters of extracted text kept per PDF.
    pub max_chars: usize,
    /// Gemini model identifier.
    pub model: String,
    /// Directory where result files are written.
    pub output_dir: PathBuf,
    /// Pause between consecutive batches.
    pub batch_delay: Duration,
    /// Retry behavior for rate-limited batch calls.
    pub retry: RetryPolicy,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            max_chars: DEFAULT_MAX_CHARS,
            model: DEFAULT_MODEL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            batch_delay: Duration::from_millis(DEFAULT_BATCH_DELAY_MS),
            retry: RetryPolicy::default(),
        }
    }
}

impl ClassifierConfig {
    /// Defaults with the environment overrides for delay tuning applied.
    pub fn from_env() -> Self {
        Self {
            batch_delay: get_delay_from_env(BATCH_DELAY_VAR, DEFAULT_BATCH_DELAY_MS),
            retry: RetryPolicy::from_env(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }
        if self.max_pages == 0 {
            return Err(ConfigError::InvalidLimit("page limit"));
        }
        if self.max_chars == 0 {
            return Err(ConfigError::InvalidLimit("character limit"));
        }
        Ok(())
    }
}

/// Read the Gemini API key, treating an empty value as unset.
pub fn api_key_from_env() -> Result<String, ConfigError> {
    std::env::var(API_KEY_VAR)
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::MissingApiKey)
}

/// Expand `~` in user-supplied paths. Relative paths stay relative to CWD.
pub fn resolve_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}
