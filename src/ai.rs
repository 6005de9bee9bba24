//! AI backends that write narration and dialogue.

pub mod claude;
pub mod error;
pub mod openai;

#[cfg(test)]
pub(crate) mod test_utils;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use tracing::info;

pub use claude::ClaudeAiClient;
pub use error::AiError;
pub use openai::OpenAiAiClient;

use crate::utils::preflight::{check_ai_credentials, AiProvider};
use crate::utils::settings::{get_env_var, get_env_vars};

/// HTTP request timeout for AI API calls.
///
/// Scene prompts are short, but local models can take a while to answer.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Output token budget for one scene.
pub(crate) const SCENE_MAX_TOKENS: usize = 2048;

/// Metadata about an AI client implementation.
#[derive(Clone, Debug)]
pub struct AiClientMetadata {
    /// Service provider name.
    pub provider: String,
    /// Model identifier.
    pub model: String,
    /// Maximum tokens requested per response.
    pub max_response_length: usize,
}

/// Trait for AI service clients.
pub trait AiClient: Send + Sync {
    /// Sends a request to the AI service and returns the raw response.
    fn send_request<'a>(
        &'a self,
        system_prompt: &'a str,
        user_prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

    /// Returns metadata about the AI client implementation.
    fn get_metadata(&self) -> AiClientMetadata;
}

// ── Shared helpers for AI client implementations ────────────────────

/// Builds an HTTP client with the standard request timeout.
pub(crate) fn build_http_client() -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

/// Strips trailing slashes so endpoint paths can be appended.
pub(crate) fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Checks an HTTP response for error status and returns a structured error
/// if non-success.
///
/// HTTP 429 becomes [`AiError::RateLimitExceeded`] so callers can back off;
/// anything else becomes [`AiError::ApiRequestFailed`].
pub(crate) async fn check_error_response(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(AiError::RateLimitExceeded.into());
    }
    let error_text = response.text().await.unwrap_or_else(|e| {
        tracing::debug!("Failed to read error response body: {e}");
        String::new()
    });
    Err(AiError::ApiRequestFailed(format!("HTTP {status}: {error_text}")).into())
}

/// Logs successful text extraction from an AI API response.
pub(crate) fn log_response_success(provider: &str, result: &Result<String>) {
    if let Ok(text) = result {
        tracing::debug!(
            response_len = text.len(),
            "Successfully extracted text content from {} API response",
            provider
        );
        tracing::debug!(
            response_content = %text,
            "{} API response content",
            provider
        );
    }
}

/// Creates the AI client selected by environment and settings.
///
/// `USE_OLLAMA` and `USE_OPENAI` pick the OpenAI-compatible client; the
/// Anthropic API is the default.
pub fn create_default_client(model_override: Option<&str>) -> Result<Box<dyn AiClient>> {
    let credentials = check_ai_credentials(model_override)?;
    info!(provider = %credentials.provider, model = %credentials.model, "Creating AI client");

    let client: Box<dyn AiClient> = match credentials.provider {
        AiProvider::Claude => {
            let api_key = get_env_vars(&["CLAUDE_API_KEY", "ANTHROPIC_API_KEY"])?;
            let base_url = get_env_var("ANTHROPIC_BASE_URL").ok();
            Box::new(ClaudeAiClient::new(credentials.model, api_key, base_url)?)
        }
        AiProvider::OpenAi => {
            let api_key = get_env_vars(&["OPENAI_API_KEY", "OPENAI_AUTH_TOKEN"])?;
            Box::new(OpenAiAiClient::new_openai(credentials.model, api_key)?)
        }
        AiProvider::Ollama => {
            let base_url = get_env_var("OLLAMA_BASE_URL").ok();
            Box::new(OpenAiAiClient::new_ollama(credentials.model, base_url)?)
        }
    };

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_base_url_strips_trailing_slashes() {
        assert_eq!(
            normalize_base_url("http://localhost:11434//"),
            "http://localhost:11434"
        );
        assert_eq!(
            normalize_base_url("https://api.anthropic.com"),
            "https://api.anthropic.com"
        );
    }
}
