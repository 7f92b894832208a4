use std::fmt;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use nd_core::{Error, InferenceError, InferenceModel, Result};
use tracing::{debug, info, warn};
use crate::Config;

/// Instruction marker the summarization model was fine-tuned with.
const SUMMARIZE_PREFIX: &str = "summarize: ";

const SUMMARY_PARAMETERS: GenerationParameters = GenerationParameters {
    max_length: 128,
    num_beams: 4,
    no_repeat_ngram_size: 4,
};

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<GenerationParameters>,
    options: RequestOptions,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct GenerationParameters {
    max_length: u32,
    num_beams: u32,
    no_repeat_ngram_size: u32,
}

#[derive(Debug, Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

impl<'a> InferenceRequest<'a> {
    fn new(inputs: &'a str) -> Self {
        Self {
            inputs,
            parameters: None,
            options: RequestOptions { wait_for_model: true },
        }
    }

    fn with_parameters(mut self, parameters: GenerationParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

/// Text-classification pipelines answer either `[{..}]` or `[[{..}]]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Flat(Vec<LabelScore>),
    Nested(Vec<Vec<LabelScore>>),
}

impl ClassificationResponse {
    fn into_top_label(self) -> Option<String> {
        let ranked = match self {
            Self::Flat(ranked) => ranked,
            Self::Nested(batches) => batches.into_iter().next()?,
        };
        ranked
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .map(|best| best.label)
    }
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    #[serde(alias = "summary_text")]
    generated_text: String,
}

/// Client for models hosted behind the Hugging Face inference API.
pub struct HuggingFaceModel {
    client: Client,
    config: Config,
}

impl HuggingFaceModel {
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(Error::Http)?;
        Ok(Self { client, config })
    }

    fn endpoint_url(&self, model_id: &str) -> String {
        format!("{}/models/{}", self.config.base_url.trim_end_matches('/'), model_id)
    }

    /// POSTs `payload` to `model_id`, retrying while the model is loading.
    async fn post<T: DeserializeOwned>(
        &self,
        model_id: &str,
        payload: &InferenceRequest<'_>,
    ) -> std::result::Result<T, InferenceError> {
        let url = self.endpoint_url(model_id);
        let policy = &self.config.retry;
        let mut retries = 0;

        loop {
            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.config.api_token)
                .json(payload)
                .send()
                .await
                .map_err(|e| request_error(model_id, e))?;

            let status = response.status();
            let body = response.text().await.map_err(|e| request_error(model_id, e))?;

            if status.is_success() {
                debug!(model = model_id, attempts = retries + 1, "inference call succeeded");
                return serde_json::from_str(&body)
                    .map_err(|e| InferenceError::malformed(model_id, format!("{}: {}", e, body)));
            }

            if policy.should_retry(status, retries) {
                retries += 1;
                info!(
                    model = model_id,
                    retry = retries,
                    max_retries = policy.max_retries,
                    "⏳ Model is loading, retrying in {:?}",
                    policy.backoff
                );
                tokio::time::sleep(policy.backoff).await;
                continue;
            }

            if policy.is_retryable(status) {
                warn!(model = model_id, attempts = retries + 1, "⚠️ Model still loading, giving up");
            }
            return Err(InferenceError::unavailable(model_id, status.as_u16(), &body));
        }
    }
}

fn request_error(model_id: &str, source: reqwest::Error) -> InferenceError {
    if source.is_timeout() {
        InferenceError::Timeout { endpoint: model_id.to_string() }
    } else {
        InferenceError::Transport { endpoint: model_id.to_string(), source }
    }
}

impl fmt::Debug for HuggingFaceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceModel")
            .field("client", &"<reqwest::Client>")
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl InferenceModel for HuggingFaceModel {
    fn name(&self) -> &str {
        "HuggingFace"
    }

    async fn classify(&self, text: &str) -> std::result::Result<String, InferenceError> {
        let model_id = &self.config.classifier_model;
        let response: ClassificationResponse = self.post(model_id, &InferenceRequest::new(text)).await?;
        response
            .into_top_label()
            .ok_or_else(|| InferenceError::malformed(model_id.as_str(), "empty label list"))
    }

    async fn summarize(&self, text: &str) -> std::result::Result<String, InferenceError> {
        let model_id = &self.config.summarizer_model;
        let prompt = format!("{}{}", SUMMARIZE_PREFIX, text);
        let request = InferenceRequest::new(&prompt).with_parameters(SUMMARY_PARAMETERS);
        let response: Vec<GeneratedText> = self.post(model_id, &request).await?;
        response
            .into_iter()
            .next()
            .map(|generated| generated.generated_text)
            .ok_or_else(|| InferenceError::malformed(model_id.as_str(), "empty generation list"))
    }
}
