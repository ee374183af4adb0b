//! Runtime configuration resolved from the environment and CLI.
//!
//! Only the credential and model are configurable. Prompt, sampling
//! parameters and limits are constants in [`crate::consts`].

use thiserror::Error;

use crate::consts::{API_KEY_ENV_VARS, DEFAULT_MODEL};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API key not set. Export API_KEY (or GEMINI_API_KEY) before starting.")]
    MissingApiKey,
}

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

impl Config {
    /// Resolve from the process environment.
    pub fn from_env(model: Option<String>) -> Result<Self, ConfigError> {
        Self::resolve(model, |name| std::env::var(name).ok())
    }

    /// Resolve using `lookup` for environment variables. Fails fast when no
    /// non-empty API key is found.
    pub fn resolve<F>(model: Option<String>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(*name))
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let model = model
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self { api_key, model })
    }
}
