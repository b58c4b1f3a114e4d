//! Model backends behind the agent runner.
//!
//! Every backend implements the [`Model`] trait, so the gate logic never
//! depends on which remote (or local) model produces the completion.
//!
//! # Supported Backends
//!
//! - **`OpenAI`-compatible**: any Chat Completions endpoint, including the
//!   Gemini `OpenAI` compatibility layer
//! - **Mock**: a deterministic scripted backend for tests and demos
//!
//! # Example
//!
//! ```rust,ignore
//! use guardchat::providers::{Model, OpenAIClient};
//!
//! let client = OpenAIClient::gemini(api_key)?;
//! let flash = client.completion_model("gemini-1.5-flash");
//! ```

mod config;
mod types;

pub mod mock;
pub mod openai;

pub use config::HttpClientConfig;
pub use mock::MockModel;
pub use openai::{GEMINI_OPENAI_BASE_URL, OpenAIClient};
pub use types::{GenerateOptions, ModelResponse, TokenUsage};

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::HeaderMap;

use crate::error::Result;
use crate::message::ChatMessage;

/// The core trait for language model implementations.
///
/// To plug in a custom backend:
/// 1. Implement [`model_id`](Model::model_id)
/// 2. Implement [`generate`](Model::generate)
/// 3. Optionally override [`provider`](Model::provider)
#[async_trait]
pub trait Model: Send + Sync {
    /// Get the model identifier (e.g., "gemini-1.5-flash").
    fn model_id(&self) -> &str;

    /// Generate a response for the given messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails or the response cannot be parsed.
    async fn generate(
        &self,
        messages: Vec<ChatMessage>,
        options: GenerateOptions,
    ) -> Result<ModelResponse>;

    /// Get the provider name (e.g., "gemini", "openai", "mock").
    fn provider(&self) -> &str {
        "unknown"
    }
}

/// A model shared read-only between agents.
pub type SharedModel = Arc<dyn Model>;

/// Base configuration for API clients.
///
/// Provides common functionality for HTTP-based API clients.
pub trait ApiClient: Clone + Send + Sync {
    /// Get the base URL for API requests.
    fn base_url(&self) -> &str;

    /// Get the HTTP client instance.
    fn http_client(&self) -> &reqwest::Client;

    /// Build authentication headers for API requests.
    fn auth_headers(&self) -> HeaderMap;

    /// Join a path onto the base URL, tolerating a trailing slash on either side.
    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Safely convert u64 to u32, saturating at `u32::MAX` if overflow.
#[inline]
#[must_use]
pub fn saturating_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturating_u32() {
        assert_eq!(saturating_u32(0), 0);
        assert_eq!(saturating_u32(100), 100);
        assert_eq!(saturating_u32(u64::from(u32::MAX)), u32::MAX);
        assert_eq!(saturating_u32(u64::MAX), u32::MAX);
    }

    #[test]
    fn test_endpoint_join() {
        let gemini = OpenAIClient::builder()
            .api_key("k")
            .base_url("https://generativelanguage.googleapis.com/v1beta/openai/")
            .build()
            .unwrap();
        assert_eq!(
            gemini.endpoint("chat/completions"),
            "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions"
        );

        let openai = OpenAIClient::new("k").unwrap();
        assert_eq!(
            openai.endpoint("/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
    }
}
