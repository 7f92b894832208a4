use std::fmt;
use std::time::Duration;

pub mod models;
pub mod retry;

pub use models::{create_model, DummyModel, HuggingFaceModel, ModelKind};
pub use nd_core::InferenceModel;
pub use retry::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Connection settings for the two hosted models.
#[derive(Clone)]
pub struct Config {
    pub api_token: String,
    /// Repository id of the classification model, e.g. `org/news-classifier`.
    pub classifier_model: String,
    /// Repository id of the summarization model.
    pub summarizer_model: String,
    pub base_url: String,
    /// Applies to every attempt, not to the whole retry loop.
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Config {
    pub fn new(
        api_token: impl Into<String>,
        classifier_model: impl Into<String>,
        summarizer_model: impl Into<String>,
    ) -> Self {
        Self {
            api_token: api_token.into(),
            classifier_model: classifier_model.into(),
            summarizer_model: summarizer_model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"<redacted>")
            .field("classifier_model", &self.classifier_model)
            .field("summarizer_model", &self.summarizer_model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

pub mod prelude {
    pub use super::{create_model, Config, ModelKind, RetryPolicy};
    pub use nd_core::{Error, InferenceError, InferenceModel, Result};
}
