//! Transport-level errors raised while talking to an OpenAI-compatible
//! chat completions endpoint, before they are folded into
//! [`forge_model::ModelError`] at the trait boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpModelError {
    #[error("request build error: {0}")]
    Build(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse provider response: {0}")]
    Parse(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("retry limit reached")]
    RetryLimit,

    #[error("request cancelled")]
    Cancelled,
}

impl HttpModelError {
    /// Retry on rate limiting and server errors, never on a client-side
    /// 4xx (other than 429).
    pub fn is_retryable(&self) -> bool {
        match self {
            HttpModelError::Network(_) => true,
            HttpModelError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
