//! Batch classification against an LLM provider.
//!
//! A batch of documents becomes one prompt, the provider returns one
//! JSON array, and the parser maps each array position back onto its
//! document. Failures stay inside the batch: whatever goes wrong, the
//! caller gets one result per document.

mod client;
mod gemini;
mod parser;
mod prompt;
mod provider;
mod retry;

pub use client::BatchClassifier;
pub use gemini::GeminiProvider;
pub use parser::parse_batch_response;
pub use prompt::PromptBuilder;
pub use provider::{LlmProvider, MockProvider, ProviderError, RateLimitError};
pub use retry::{get_delay_from_env, parse_retry_after, RetryPolicy};

use thiserror::Error;

/// Why one document in a batch produced no classification.
#[derive(Debug, Clone, Error)]
pub enum ClassificationError {
    #[error("model response has no entry for position {position}")]
    MissingEntry { position: usize },
    #[error("invalid entry at position {position}: {reason}")]
    InvalidEntry { position: usize, reason: String },
    #[error("model response is not a JSON array")]
    NotAnArray,
    #[error("model returned malformed JSON: {0}")]
    MalformedJson(String),
    #[error("batch request failed after {attempts} attempts: {reason}")]
    BatchFailed { attempts: u32, reason: String },
}
