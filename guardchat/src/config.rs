//! Model backend configuration from the environment.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::{GEMINI_OPENAI_BASE_URL, OpenAIClient, SharedModel};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "GEMINI_BASE_URL";
/// Environment variable overriding the model identifier.
pub const MODEL_ENV: &str = "GEMINI_MODEL";
/// Environment variable setting a request timeout in seconds.
pub const TIMEOUT_ENV: &str = "GEMINI_TIMEOUT_SECS";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Settings for the hosted chat-completion backend.
#[derive(Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Base URL of the OpenAI-compatible endpoint.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Request timeout; `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ModelConfig {
    /// Default settings for the given key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: GEMINI_OPENAI_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            timeout_secs: None,
        }
    }

    /// Read settings from the process environment.
    ///
    /// # Errors
    ///
    /// See [`from_lookup`](Self::from_lookup).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, a variable-name to value function.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `GEMINI_API_KEY` is missing or blank, or
    /// if `GEMINI_TIMEOUT_SECS` is not a whole number of seconds.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = read(API_KEY_ENV)
            .ok_or_else(|| Error::config(format!("{API_KEY_ENV} is not set")))?;
        let mut config = Self::new(api_key.trim());

        if let Some(base_url) = read(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        if let Some(model) = read(MODEL_ENV) {
            config.model = model;
        }
        if let Some(timeout) = read(TIMEOUT_ENV) {
            let secs = timeout.trim().parse::<u64>().map_err(|e| {
                Error::config(format!("{TIMEOUT_ENV} must be a number of seconds: {e}"))
            })?;
            config.timeout_secs = Some(secs);
        }
        Ok(config)
    }

    /// Build the shared model backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn build_model(&self) -> Result<SharedModel> {
        let mut builder = OpenAIClient::builder()
            .api_key(&self.api_key)
            .base_url(&self.base_url)
            .provider_name("gemini");
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout_secs(secs);
        }
        let client = builder.build()?;
        Ok(Arc::new(client.completion_model(&self.model)))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ModelConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "k-123")])).unwrap();
        assert_eq!(config.api_key, "k-123");
        assert_eq!(config.base_url, GEMINI_OPENAI_BASE_URL);
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.timeout_secs, None);
    }

    #[test]
    fn test_overrides() {
        let config = ModelConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_BASE_URL", "http://localhost:9000/v1"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("GEMINI_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:9000/v1");
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.timeout_secs, Some(30));
    }

    #[test]
    fn test_missing_or_blank_key() {
        let err = ModelConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("GEMINI_API_KEY")));

        let err = ModelConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_bad_timeout() {
        let err = ModelConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", ModelConfig::new("secret-key"));
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_build_model() {
        let model = ModelConfig::new("k").build_model().unwrap();
        assert_eq!(model.model_id(), "gemini-1.5-flash");
        assert_eq!(model.provider(), "gemini");
    }
}
