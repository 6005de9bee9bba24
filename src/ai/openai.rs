//! OpenAI-compatible API client implementation (works with OpenAI, Ollama, etc.)

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    build_http_client, check_error_response, log_response_success, normalize_base_url, AiClient,
    AiClientMetadata, AiError, SCENE_MAX_TOKENS,
};

/// Default OpenAI endpoint.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Default local Ollama endpoint.
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// OpenAI API request message
#[derive(Serialize, Debug)]
struct Message {
    role: String,
    content: String,
}

/// OpenAI API request body
#[derive(Serialize, Debug)]
struct OpenAiRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

/// OpenAI API response choice
#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

/// OpenAI API response message
#[derive(Deserialize, Debug)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI API response
#[derive(Deserialize, Debug)]
struct OpenAiResponse {
    choices: Vec<Choice>,
    model: Option<String>,
}

/// OpenAI-compatible API client (works with OpenAI, Ollama, etc.)
pub struct OpenAiAiClient {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication (optional for Ollama)
    api_key: Option<String>,
    /// Model identifier
    model: String,
    /// API root without trailing slash
    base_url: String,
    /// Temperature for response generation
    temperature: Option<f32>,
}

impl OpenAiAiClient {
    /// Create a new OpenAI-compatible API client
    pub fn new(
        model: String,
        api_key: Option<String>,
        base_url: &str,
        temperature: Option<f32>,
    ) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            api_key,
            model,
            base_url: normalize_base_url(base_url),
            temperature,
        })
    }

    /// Create a new client for Ollama with sensible defaults
    pub fn new_ollama(model: String, base_url: Option<String>) -> Result<Self> {
        Self::new(
            model,
            None,
            base_url.as_deref().unwrap_or(OLLAMA_BASE_URL),
            Some(0.8),
        )
    }

    /// Create a new client for OpenAI with sensible defaults
    pub fn new_openai(model: String, api_key: String) -> Result<Self> {
        Self::new(model, Some(api_key), OPENAI_BASE_URL, Some(0.8))
    }

    /// Build the full API URL
    fn get_api_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    /// Determine if this is likely an Ollama instance
    fn is_ollama(&self) -> bool {
        self.base_url.contains("localhost")
            || self.base_url.contains("127.0.0.1")
            || self.api_key.is_none()
    }

    /// GPT-5 and o-series models take max_completion_tokens and only the
    /// default temperature.
    fn is_reasoning_series(&self) -> bool {
        ["gpt-5", "o1", "o3", "o4"]
            .iter()
            .any(|prefix| self.model.starts_with(prefix))
    }

    fn build_request(&self, system_prompt: &str, user_prompt: &str) -> OpenAiRequest {
        let mut messages = Vec::new();

        if !system_prompt.is_empty() {
            messages.push(Message {
                role: "system".to_string(),
                content: system_prompt.to_string(),
            });
        }

        messages.push(Message {
            role: "user".to_string(),
            content: user_prompt.to_string(),
        });

        if self.is_reasoning_series() {
            OpenAiRequest {
                model: self.model.clone(),
                messages,
                max_tokens: None,
                max_completion_tokens: Some(SCENE_MAX_TOKENS),
                temperature: None,
                stream: false,
            }
        } else {
            OpenAiRequest {
                model: self.model.clone(),
                messages,
                max_tokens: Some(SCENE_MAX_TOKENS),
                max_completion_tokens: None,
                temperature: self.temperature,
                stream: false,
            }
        }
    }
}

impl AiClient for OpenAiAiClient {
    fn send_request<'a>(
        &'a self,
        system_prompt: &'a str,
        user_prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            debug!(
                system_prompt_len = system_prompt.len(),
                user_prompt_len = user_prompt.len(),
                model = %self.model,
                base_url = %self.base_url,
                is_ollama = self.is_ollama(),
                "Preparing OpenAI-compatible API request"
            );

            let request = self.build_request(system_prompt, user_prompt);
            let api_url = self.get_api_url();
            info!(url = %api_url, model = %self.model, "Sending request to OpenAI-compatible API");

            let mut req_builder = self
                .client
                .post(&api_url)
                .header("Content-Type", "application/json")
                .json(&request);

            if let Some(ref api_key) = self.api_key {
                req_builder = req_builder.header("Authorization", format!("Bearer {api_key}"));
            }

            let response = req_builder
                .send()
                .await
                .map_err(|e| AiError::NetworkError(e.to_string()))?;

            let response = check_error_response(response).await?;

            let openai_response: OpenAiResponse = response
                .json()
                .await
                .map_err(|e| AiError::InvalidResponseFormat(e.to_string()))?;

            debug!(
                choice_count = openai_response.choices.len(),
                model = ?openai_response.model,
                "Received OpenAI-compatible API response"
            );

            let result = openai_response
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .ok_or_else(|| {
                    AiError::InvalidResponseFormat("No choices in response".to_string()).into()
                });

            log_response_success("OpenAI-compatible", &result);
            result
        })
    }

    fn get_metadata(&self) -> AiClientMetadata {
        let provider = if self.is_ollama() { "Ollama" } else { "OpenAI" };

        AiClientMetadata {
            provider: provider.to_string(),
            model: self.model.clone(),
            max_response_length: SCENE_MAX_TOKENS,
        }
    }
}
