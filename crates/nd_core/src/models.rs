use async_trait::async_trait;
use crate::error::InferenceError;

/// A remote (or stand-in) text model able to label and summarize articles.
#[async_trait]
pub trait InferenceModel: Send + Sync {
    fn name(&self) -> &str;

    /// Returns the top-ranked category label for `text`.
    async fn classify(&self, text: &str) -> std::result::Result<String, InferenceError>;

    /// Returns a generated summary of `text`.
    async fn summarize(&self, text: &str) -> std::result::Result<String, InferenceError>;
}
