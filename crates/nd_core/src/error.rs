use thiserror::Error;

/// Longest slice of a response body carried inside an [`InferenceError`].
pub const DIAGNOSTIC_LIMIT: usize = 200;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

/// Terminal failure of a single call to a remote model endpoint.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// The endpoint answered with a non-success status, or kept answering
    /// "loading" until the retry budget ran out.
    #[error("inference unavailable for {endpoint} (status {status}): {body}")]
    Unavailable {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("inference request to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("inference request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed inference response from {endpoint}: {detail}")]
    MalformedResponse { endpoint: String, detail: String },
}

impl InferenceError {
    pub fn unavailable(endpoint: impl Into<String>, status: u16, body: &str) -> Self {
        Self::Unavailable {
            endpoint: endpoint.into(),
            status,
            body: truncate(body, DIAGNOSTIC_LIMIT),
        }
    }

    pub fn malformed(endpoint: impl Into<String>, detail: impl AsRef<str>) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.into(),
            detail: truncate(detail.as_ref(), DIAGNOSTIC_LIMIT),
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            Self::Unavailable { endpoint, .. }
            | Self::Timeout { endpoint }
            | Self::Transport { endpoint, .. }
            | Self::MalformedResponse { endpoint, .. } => endpoint,
        }
    }
}

fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
