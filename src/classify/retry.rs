//! Retry tuning for rate-limited API calls.

use std::time::Duration;

/// Overrides the base retry delay, in milliseconds.
pub const RETRY_DELAY_VAR: &str = "CLASIFICA_RETRY_DELAY_MS";

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BASE_DELAY_MS: u64 = 1_000;
const MAX_DELAY_MS: u64 = 60_000;
const MAX_RETRY_AFTER_SECS: u64 = 60;

/// Bounded retry for rate-limited batch calls.
///
/// `max_attempts` is the total call budget per batch, including the
/// first try. Waits double with each attempt unless the server asked
/// for a specific delay.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Default policy with the environment override for the base delay.
    pub fn from_env() -> Self {
        Self {
            base_delay: get_delay_from_env(RETRY_DELAY_VAR, DEFAULT_BASE_DELAY_MS),
            ..Self::default()
        }
    }

    /// Exponential backoff for a 1-based attempt, capped at one minute.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let ms = (self.base_delay.as_millis() as u64).saturating_mul(2u64.pow(exponent));
        Duration::from_millis(ms.min(MAX_DELAY_MS))
    }

    /// Wait before the next attempt, honoring the server's Retry-After
    /// when one was given.
    pub fn next_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or_else(|| self.backoff_delay(attempt))
    }
}

/// Parse a Retry-After header value in seconds, capped at one minute.
pub fn parse_retry_after(header: Option<&str>) -> Option<Duration> {
    header
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(|secs| Duration::from_secs(secs.min(MAX_RETRY_AFTER_SECS)))
}

/// Read a delay in milliseconds from the environment, falling back to
/// `default_ms` when the variable is unset or unparseable.
pub fn get_delay_from_env(env_var: &str, default_ms: u64) -> Duration {
    std::env::var(env_var)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(default_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_delay(1), Duration::from_secs(1));
        assert_eq!(policy.backoff_delay(2), Duration::from_secs(2));
        assert_eq!(policy.backoff_delay(3), Duration::from_secs(4));
    }

    #[test]
    fn backoff_caps_at_one_minute() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_delay(10), Duration::from_secs(60));
        assert_eq!(policy.backoff_delay(100), Duration::from_secs(60));
    }

    #[test]
    fn next_delay_prefers_retry_after() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.next_delay(1, Some(Duration::from_secs(30))),
            Duration::from_secs(30)
        );
        assert_eq!(policy.next_delay(2, None), Duration::from_secs(2));
    }

    #[test]
    fn parse_retry_after_handles_garbage_and_caps() {
        assert_eq!(parse_retry_after(Some("30")), Some(Duration::from_secs(30)));
        assert_eq!(parse_retry_after(Some(" 5 ")), Some(Duration::from_secs(5)));
        assert_eq!(
            parse_retry_after(Some("3600")),
            Some(Duration::from_secs(60))
        );
        assert_eq!(parse_retry_after(Some("pronto")), None);
        assert_eq!(parse_retry_after(None), None);
    }

    #[test]
    fn env_delay_falls_back_to_default() {
        assert_eq!(
            get_delay_from_env("CLASIFICA_TEST_DELAY_UNSET", 250),
            Duration::from_millis(250)
        );

        std::env::set_var("CLASIFICA_TEST_DELAY_SET", "1500");
        assert_eq!(
            get_delay_from_env("CLASIFICA_TEST_DELAY_SET", 250),
            Duration::from_millis(1500)
        );
        std::env::remove_var("CLASIFICA_TEST_DELAY_SET");
    }
}
