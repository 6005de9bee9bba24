//! Preflight validation checks for early failure detection
//!
//! Commands call these before extracting history or contacting a backend so
//! that missing credentials fail fast with a clear message.

use std::path::Path;

use anyhow::{Context, Result};

use crate::ai::AiError;
use crate::git::GitRepository;
use crate::utils::settings::{get_env_var, get_env_vars};

/// Default Anthropic model.
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-5";

/// Default OpenAI model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// Default Ollama model.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

/// Result of AI credential validation
#[derive(Debug)]
pub struct AiCredentialInfo {
    /// The AI provider that will be used
    pub provider: AiProvider,
    /// The model that will be used
    pub model: String,
}

/// AI provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    /// Anthropic Claude API
    Claude,
    /// OpenAI API
    OpenAi,
    /// Local Ollama
    Ollama,
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiProvider::Claude => write!(f, "Claude API"),
            AiProvider::OpenAi => write!(f, "OpenAI API"),
            AiProvider::Ollama => write!(f, "Ollama"),
        }
    }
}

fn flag_enabled(key: &str) -> bool {
    get_env_var(key).map(|val| val == "true").unwrap_or(false)
}

fn pick_model(model_override: Option<&str>, env_key: &str, default: &str) -> String {
    model_override
        .map(String::from)
        .or_else(|| get_env_var(env_key).ok())
        .unwrap_or_else(|| default.to_string())
}

/// Validate AI credentials are available before processing
///
/// This performs a lightweight check of environment variables without
/// creating a client. `USE_OLLAMA` wins over `USE_OPENAI`; otherwise the
/// Anthropic API is used.
pub fn check_ai_credentials(model_override: Option<&str>) -> Result<AiCredentialInfo> {
    // Ollama needs no credentials, just a model
    if flag_enabled("USE_OLLAMA") {
        return Ok(AiCredentialInfo {
            provider: AiProvider::Ollama,
            model: pick_model(model_override, "OLLAMA_MODEL", DEFAULT_OLLAMA_MODEL),
        });
    }

    if flag_enabled("USE_OPENAI") {
        get_env_vars(&["OPENAI_API_KEY", "OPENAI_AUTH_TOKEN"]).map_err(|_| {
            AiError::ApiKeyNotFound {
                provider: "OpenAI".to_string(),
                variables: "OPENAI_API_KEY or OPENAI_AUTH_TOKEN".to_string(),
            }
        })?;

        return Ok(AiCredentialInfo {
            provider: AiProvider::OpenAi,
            model: pick_model(model_override, "OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
        });
    }

    get_env_vars(&["CLAUDE_API_KEY", "ANTHROPIC_API_KEY"]).map_err(|_| {
        AiError::ApiKeyNotFound {
            provider: "Claude".to_string(),
            variables: "CLAUDE_API_KEY or ANTHROPIC_API_KEY".to_string(),
        }
    })?;

    Ok(AiCredentialInfo {
        provider: AiProvider::Claude,
        model: pick_model(model_override, "ANTHROPIC_MODEL", DEFAULT_CLAUDE_MODEL),
    })
}

/// Validate the path is inside a git repository
///
/// This is a lightweight check that opens the repository without
/// loading any commit data.
pub fn check_git_repository(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => GitRepository::open_at(path).map(drop).with_context(|| {
            format!("Not a git repository: {}", path.display())
        }),
        None => GitRepository::open().map(drop).context(
            "Not in a git repository. Please run this command from within a git repository.",
        ),
    }
}
