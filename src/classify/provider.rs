//! Provider abstraction over text-generation backends.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Rate limit signal from the API, carrying the server-requested wait
/// when a Retry-After header was present.
#[derive(Debug, Clone, Error)]
#[error("rate limited by the API")]
pub struct RateLimitError {
    pub retry_after: Option<Duration>,
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error(transparent)]
    RateLimited(#[from] RateLimitError),
    #[error("request failed: {0}")]
    Communication(String),
    #[error("API error ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("API error: {0}")]
    Api(String),
    #[error("empty response from model")]
    EmptyResponse,
}

/// A text-generation backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider name for log lines.
    fn name(&self) -> &str;

    /// Send one prompt and return the raw text of the model's reply.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Scripted provider for tests.
///
/// Responses are served from a queue in push order; once the queue is
/// empty every call returns the default response. Clones share the
/// queue and the call counter.
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    queue: Arc<Mutex<VecDeque<Result<String, ProviderError>>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockProvider {
    pub fn new(default_response: impl Into<String>) -> Self {
        Self {
            default_response: default_response.into(),
            queue: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Queue a canned response for a future call.
    pub fn push_response(&self, response: impl Into<String>) {
        self.queue.lock().unwrap().push_back(Ok(response.into()));
    }

    /// Queue an error for a future call.
    pub fn push_error(&self, error: ProviderError) {
        self.queue.lock().unwrap().push_back(Err(error));
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        *self.call_count.lock().unwrap() += 1;
        match self.queue.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(self.default_response.clone()),
        }
    }
}
