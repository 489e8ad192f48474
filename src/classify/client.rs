//! Batch classification with bounded rate-limit retry.

use tracing::{debug, warn};

use crate::batch::Batch;
use crate::models::TopicClassification;

use super::parser::parse_batch_response;
use super::prompt::PromptBuilder;
use super::provider::{LlmProvider, ProviderError};
use super::retry::RetryPolicy;
use super::ClassificationError;

/// Classifies batches of documents through an [`LlmProvider`].
///
/// Errors never escape a batch: every failure mode collapses into one
/// [`ClassificationError`] per affected document, so a bad batch cannot
/// take down the run. Only rate limiting is retried; other provider
/// errors fail the batch on the first attempt.
pub struct BatchClassifier<P> {
    provider: P,
    retry: RetryPolicy,
}

impl<P: LlmProvider> BatchClassifier<P> {
    pub fn new(provider: P, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    /// Classify one batch, returning one result per document in order.
    pub async fn classify_batch(
        &self,
        batch: &Batch<'_>,
    ) -> Vec<Result<TopicClassification, ClassificationError>> {
        let prompt = PromptBuilder::new(batch.documents).build();
        debug!(
            "Batch {}: prompt is {} chars for {} documents",
            batch.number,
            prompt.chars().count(),
            batch.len()
        );

        let mut attempt = 1u32;
        let raw = loop {
            match self.provider.generate(&prompt).await {
                Ok(text) => break text,
                Err(ProviderError::RateLimited(limit)) => {
                    if attempt >= self.retry.max_attempts {
                        warn!(
                            "Batch {}: still rate limited after {} attempts, giving up",
                            batch.number, attempt
                        );
                        return fail_batch(batch, attempt, &ProviderError::RateLimited(limit));
                    }
                    let wait = self.retry.next_delay(attempt, limit.retry_after);
                    warn!(
                        "Batch {}: {} rate limited (attempt {}), waiting {:?}",
                        batch.number,
                        self.provider.name(),
                        attempt,
                        wait
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(error) => {
                    warn!(
                        "Batch {}: {} call failed: {}",
                        batch.number,
                        self.provider.name(),
                        error
                    );
                    return fail_batch(batch, attempt, &error);
                }
            }
        };

        match parse_batch_response(&raw, batch.len()) {
            Ok(results) => results,
            Err(error) => {
                warn!("Batch {}: unusable response: {}", batch.number, error);
                batch.documents.iter().map(|_| Err(error.clone())).collect()
            }
        }
    }
}

fn fail_batch(
    batch: &Batch<'_>,
    attempts: u32,
    error: &ProviderError,
) -> Vec<Result<TopicClassification, ClassificationError>> {
    let failure = ClassificationError::BatchFailed {
        attempts,
        reason: error.to_string(),
    };
    batch.documents.iter().map(|_| Err(failure.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::provider::{MockProvider, RateLimitError};
    use crate::models::{Confidence, Document};
    use std::path::PathBuf;
    use std::time::Duration;

    fn docs(n: usize) -> Vec<Document> {
        (1..=n)
            .map(|i| Document {
                index: i,
                path: PathBuf::from(format!("/docs/doc{i}.pdf")),
                filename: format!("doc{i}.pdf"),
                text: format!("contenido del documento número {i}"),
                pages_read: 1,
            })
            .collect()
    }

    fn canned(entries: usize) -> String {
        let items: Vec<serde_json::Value> = (1..=entries)
            .map(|i| {
                serde_json::json!({
                    "documento": i,
                    "archivo": format!("doc{i}.pdf"),
                    "tema_general": "Historia",
                    "subtema": "Historia Medieval",
                    "tema_especifico": "Feudalismo en Europa",
                    "confianza": "alta",
                    "palabras_clave": ["historia", "medieval"],
                })
            })
            .collect();
        serde_json::Value::Array(items).to_string()
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn successful_batch_yields_one_result_per_document() {
        let documents = docs(2);
        let batch = Batch {
            number: 1,
            documents: &documents,
        };
        let mock = MockProvider::new(canned(2));
        let classifier = BatchClassifier::new(mock.clone(), fast_policy());

        let results = classifier.classify_batch(&batch).await;
        assert_eq!(results.len(), 2);
        for result in &results {
            let topic = result.as_ref().unwrap();
            assert_eq!(topic.general_topic, "Historia");
            assert_eq!(topic.confidence, Confidence::Alta);
        }
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn rate_limit_is_retried_until_success() {
        let documents = docs(1);
        let batch = Batch {
            number: 1,
            documents: &documents,
        };
        let mock = MockProvider::new(canned(1));
        mock.push_error(RateLimitError { retry_after: None }.into());
        mock.push_error(
            RateLimitError {
                retry_after: Some(Duration::from_millis(1)),
            }
            .into(),
        );

        let classifier = BatchClassifier::new(mock.clone(), fast_policy());
        let results = classifier.classify_batch(&batch).await;

        assert!(results[0].is_ok());
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn exhausted_rate_limit_fails_every_document() {
        let documents = docs(2);
        let batch = Batch {
            number: 2,
            documents: &documents,
        };
        let mock = MockProvider::new(canned(2));
        for _ in 0..3 {
            mock.push_error(RateLimitError { retry_after: None }.into());
        }

        let classifier = BatchClassifier::new(mock.clone(), fast_policy());
        let results = classifier.classify_batch(&batch).await;

        assert_eq!(mock.call_count(), 3);
        assert_eq!(results.len(), 2);
        for result in &results {
            match result {
                Err(ClassificationError::BatchFailed { attempts, reason }) => {
                    assert_eq!(*attempts, 3);
                    assert!(reason.contains("rate limited"));
                }
                other => panic!("expected batch failure, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn non_rate_limit_errors_fail_immediately() {
        let documents = docs(2);
        let batch = Batch {
            number: 1,
            documents: &documents,
        };
        let mock = MockProvider::new(canned(2));
        mock.push_error(ProviderError::Http {
            status: 500,
            message: "internal error".to_string(),
        });

        let classifier = BatchClassifier::new(mock.clone(), fast_policy());
        let results = classifier.classify_batch(&batch).await;

        assert_eq!(mock.call_count(), 1);
        assert!(results.iter().all(|r| matches!(
            r,
            Err(ClassificationError::BatchFailed { attempts: 1, .. })
        )));
    }

    #[tokio::test]
    async fn unusable_response_fails_every_document() {
        let documents = docs(2);
        let batch = Batch {
            number: 1,
            documents: &documents,
        };
        let mock = MockProvider::new("no pienso responder con JSON");
        let classifier = BatchClassifier::new(mock, fast_policy());

        let results = classifier.classify_batch(&batch).await;
        assert!(results
            .iter()
            .all(|r| matches!(r, Err(ClassificationError::MalformedJson(_)))));
    }

    #[tokio::test]
    async fn partially_valid_response_degrades_per_position() {
        let documents = docs(2);
        let batch = Batch {
            number: 1,
            documents: &documents,
        };
        let mock = MockProvider::new(canned(1));
        let classifier = BatchClassifier::new(mock, fast_policy());

        let results = classifier.classify_batch(&batch).await;
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(ClassificationError::MissingEntry { position: 2 })
        ));
    }
}
