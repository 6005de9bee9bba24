//! Settings and configuration utilities.
//!
//! This module reads settings from $HOME/.commit-theatre/settings.json and
//! uses them as a fallback for environment variables.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::density::DensityConfig;

/// Name of the per-user state directory under $HOME.
pub const STATE_DIR: &str = ".commit-theatre";

/// Playback and pacing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Delay between characters in the typewriter effect; 0 disables it.
    pub typewriter_delay_ms: u64,
    /// Minimum time between two AI requests.
    pub request_interval_ms: u64,
    /// Additional attempts after a failed AI request.
    pub retries: u32,
    /// Age after which cached extractions are ignored.
    pub cache_ttl_secs: u64,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            typewriter_delay_ms: 12,
            request_interval_ms: 500,
            retries: 2,
            cache_ttl_secs: 3600,
        }
    }
}

/// Settings loaded from $HOME/.commit-theatre/settings.json.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Environment variable overrides.
    #[serde(default)]
    pub env: HashMap<String, String>,
    /// Scene density thresholds.
    #[serde(default)]
    pub density: DensityConfig,
    /// Playback and pacing.
    #[serde(default)]
    pub stage: StageConfig,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // A missing file means defaults
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Settings>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the state directory, `$HOME/.commit-theatre`.
    pub fn state_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home_dir.join(STATE_DIR))
    }

    /// Returns the default settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        Ok(Self::state_dir()?.join("settings.json"))
    }

    /// Returns an environment variable with fallback to settings.
    pub fn get_env_var(&self, key: &str) -> Option<String> {
        match env::var(key) {
            Ok(value) => Some(value),
            Err(_) => self.env.get(key).cloned(),
        }
    }
}

/// Returns an environment variable with fallback to settings.
pub fn get_env_var(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) => Ok(value),
        Err(_) => match Settings::load() {
            Ok(settings) => settings
                .env
                .get(key)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Environment variable not found: {}", key)),
            Err(err) => {
                // Report the missing variable, keep the settings failure as context
                Err(anyhow::anyhow!("Environment variable not found: {}", key).context(err))
            }
        },
    }
}

/// Tries multiple environment variables with fallback to settings.
pub fn get_env_vars(keys: &[&str]) -> Result<String> {
    for key in keys {
        if let Ok(value) = get_env_var(key) {
            return Ok(value);
        }
    }

    Err(anyhow::anyhow!(
        "None of the environment variables found: {:?}",
        keys
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn settings_load_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");

        let settings_json = r#"{
            "env": {
                "TEST_VAR": "test_value",
                "CLAUDE_API_KEY": "test_api_key"
            },
            "density": { "full_max": 30 },
            "stage": { "typewriter_delay_ms": 0, "retries": 5 }
        }"#;
        fs::write(&settings_path, settings_json).unwrap();

        let settings = Settings::load_from_path(&settings_path).unwrap();

        assert_eq!(settings.env.get("TEST_VAR").unwrap(), "test_value");
        assert_eq!(settings.env.get("CLAUDE_API_KEY").unwrap(), "test_api_key");
        assert_eq!(settings.density.full_max, 30);
        assert_eq!(settings.density.montage_max, 200);
        assert_eq!(settings.stage.typewriter_delay_ms, 0);
        assert_eq!(settings.stage.retries, 5);
        assert_eq!(settings.stage.cache_ttl_secs, 3600);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_from_path(temp_dir.path().join("absent.json")).unwrap();

        assert!(settings.env.is_empty());
        assert_eq!(settings.density, DensityConfig::default());
        assert_eq!(settings.stage, StageConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        fs::write(&settings_path, "{ not json").unwrap();

        let err = Settings::load_from_path(&settings_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse settings file"));
    }

    #[test]
    fn settings_get_env_var() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");

        let settings_json = r#"{
            "env": {
                "COMMIT_THEATRE_TEST_VAR": "test_value"
            }
        }"#;
        fs::write(&settings_path, settings_json).unwrap();

        let settings = Settings::load_from_path(&settings_path).unwrap();

        // Environment takes precedence
        env::set_var("COMMIT_THEATRE_TEST_VAR", "env_override");
        assert_eq!(
            settings.get_env_var("COMMIT_THEATRE_TEST_VAR").unwrap(),
            "env_override"
        );

        env::remove_var("COMMIT_THEATRE_TEST_VAR");
        assert_eq!(
            settings.get_env_var("COMMIT_THEATRE_TEST_VAR").unwrap(),
            "test_value"
        );
        assert_eq!(settings.get_env_var("COMMIT_THEATRE_UNSET_VAR"), None);
    }
}
