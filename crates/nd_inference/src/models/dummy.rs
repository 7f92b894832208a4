use std::fmt;
use nd_core::{InferenceError, InferenceModel};

pub const DUMMY_CATEGORY: &str = "General";
const SUMMARY_WORDS: usize = 20;

pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl InferenceModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn classify(&self, _text: &str) -> Result<String, InferenceError> {
        Ok(DUMMY_CATEGORY.to_string())
    }

    async fn summarize(&self, text: &str) -> Result<String, InferenceError> {
        // Take first 20 words and join them
        let words: Vec<&str> = text.split_whitespace().take(SUMMARY_WORDS).collect();
        Ok(words.join(" "))
    }
}
