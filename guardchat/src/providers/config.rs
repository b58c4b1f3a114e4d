//! HTTP client configuration for model providers.

use std::time::Duration;

use crate::error::{LlmError, Result};

/// Shared HTTP client configuration.
///
/// No timeout is applied unless one is set: a hung remote call blocks
/// the message it belongs to.
#[derive(Debug, Clone, Default)]
pub struct HttpClientConfig {
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// User agent string.
    pub user_agent: Option<String>,
}

impl HttpClientConfig {
    /// Set the request timeout in seconds.
    #[must_use]
    pub const fn with_timeout_secs(mut self, timeout: u64) -> Self {
        self.timeout_secs = Some(timeout);
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a reqwest client with this configuration.
    ///
    /// # Errors
    ///
    /// Returns an internal [`LlmError`] if the TLS backend cannot be initialized.
    pub fn build_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        if let Some(ref user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        builder
            .build()
            .map_err(|e| LlmError::internal(format!("Failed to build HTTP client: {e}")).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_config_default() {
        let config = HttpClientConfig::default();
        assert!(config.timeout_secs.is_none());
        assert!(config.user_agent.is_none());
        assert!(config.build_client().is_ok());
    }

    #[test]
    fn test_http_client_config_builder() {
        let config = HttpClientConfig::default()
            .with_timeout_secs(30)
            .with_user_agent("guardchat-test");
        assert_eq!(config.timeout_secs, Some(30));
        assert_eq!(config.user_agent.as_deref(), Some("guardchat-test"));
        assert!(config.build_client().is_ok());
    }
}
