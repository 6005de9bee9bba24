//! AI backend error handling.

use thiserror::Error;

/// Errors raised while talking to an AI backend.
#[derive(Error, Debug)]
pub enum AiError {
    /// API key not found in environment variables or settings.
    #[error("{provider} API key not found. Set {variables}")]
    ApiKeyNotFound {
        /// Backend that needs the key.
        provider: String,
        /// Variables that were checked.
        variables: String,
    },

    /// API request failed with error message.
    #[error("AI API request failed: {0}")]
    ApiRequestFailed(String),

    /// Invalid response format from the API.
    #[error("Invalid response format from AI API: {0}")]
    InvalidResponseFormat(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded. Please try again later")]
    RateLimitExceeded,

    /// Network connectivity error.
    #[error("Network error: {0}")]
    NetworkError(String),
}

impl AiError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded | Self::NetworkError(_) | Self::ApiRequestFailed(_)
        )
    }
}
