use reqwest::StatusCode;
use std::time::Duration;

/// Bounded retry for endpoints that answer "loading" while the model spins up.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Fixed wait before each retry.
    pub backoff: Duration,
    retryable: fn(StatusCode) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(5))
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
            retryable: is_model_loading,
        }
    }

    pub fn with_retryable(mut self, retryable: fn(StatusCode) -> bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn is_retryable(&self, status: StatusCode) -> bool {
        (self.retryable)(status)
    }

    /// Whether another attempt is allowed after `retries_done` retries ended in `status`.
    pub fn should_retry(&self, status: StatusCode, retries_done: u32) -> bool {
        self.is_retryable(status) && retries_done < self.max_retries
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

/// Hosted models answer 503 while their container is still loading.
pub fn is_model_loading(status: StatusCode) -> bool {
    status == StatusCode::SERVICE_UNAVAILABLE
}
