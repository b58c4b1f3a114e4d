//! Deterministic scripted model backend.
//!
//! [`MockModel`] answers from a list of rules checked in insertion order,
//! falling back to a default response when no rule matches. It makes no
//! network calls and records every request, so callers can assert how many
//! generations actually happened.
//!
//! ```rust,ignore
//! use guardchat::providers::MockModel;
//!
//! let model = MockModel::new("mock")
//!     .when_user_contains("Python", r#"{"on_topic": true, "reasoning": "python"}"#)
//!     .with_fallback(r#"{"on_topic": false, "reasoning": "other"}"#);
//! ```

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{LlmError, Result};
use crate::message::{ChatMessage, MessageRole};
use crate::providers::{GenerateOptions, Model, ModelResponse, TokenUsage, saturating_u32};

/// A request observed by a [`MockModel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    /// The system instructions, if any were sent.
    pub system: Option<String>,
    /// The concatenated user text.
    pub user: String,
    /// Whether a structured response format was requested.
    pub structured: bool,
}

impl MockCall {
    fn from_request(messages: &[ChatMessage], options: &GenerateOptions) -> Self {
        let text_of = |role: MessageRole| {
            messages
                .iter()
                .filter(|m| m.role == role)
                .filter_map(ChatMessage::text)
                .collect::<Vec<_>>()
                .join("\n")
        };
        let system = text_of(MessageRole::System);
        Self {
            system: (!system.is_empty()).then_some(system),
            user: text_of(MessageRole::User),
            structured: options.is_structured(),
        }
    }
}

type Matcher = Box<dyn Fn(&MockCall) -> bool + Send + Sync>;

struct Rule {
    matcher: Matcher,
    response: String,
}

/// A deterministic mock model for tests and offline demos.
pub struct MockModel {
    model_id: String,
    rules: Vec<Rule>,
    fallback: Option<String>,
    calls: Mutex<Vec<MockCall>>,
}

impl std::fmt::Debug for MockModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockModel")
            .field("model_id", &self.model_id)
            .field("rules", &self.rules.len())
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl MockModel {
    /// Create a mock with no rules and no fallback.
    #[must_use]
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            rules: Vec::new(),
            fallback: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always answers with `response`.
    #[must_use]
    pub fn always(response: impl Into<String>) -> Self {
        Self::new("mock").with_fallback(response)
    }

    /// Answer with `response` when `matcher` accepts the request.
    #[must_use]
    pub fn when<F>(mut self, matcher: F, response: impl Into<String>) -> Self
    where
        F: Fn(&MockCall) -> bool + Send + Sync + 'static,
    {
        self.rules.push(Rule {
            matcher: Box::new(matcher),
            response: response.into(),
        });
        self
    }

    /// Answer with `response` when the user text contains `needle`.
    #[must_use]
    pub fn when_user_contains(self, needle: impl Into<String>, response: impl Into<String>) -> Self {
        let needle = needle.into();
        self.when(move |call| call.user.contains(&needle), response)
    }

    /// Answer with `response` when the system instructions contain `needle`.
    #[must_use]
    pub fn when_system_contains(
        self,
        needle: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        let needle = needle.into();
        self.when(
            move |call| call.system.as_deref().is_some_and(|s| s.contains(&needle)),
            response,
        )
    }

    /// Answer with `response` when no rule matches.
    #[must_use]
    pub fn with_fallback(mut self, response: impl Into<String>) -> Self {
        self.fallback = Some(response.into());
        self
    }

    /// All requests seen so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests seen so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn respond(&self, call: &MockCall) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| (rule.matcher)(call))
            .map(|rule| rule.response.as_str())
            .or(self.fallback.as_deref())
    }
}

#[async_trait]
impl Model for MockModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn provider(&self) -> &str {
        "mock"
    }

    async fn generate(
        &self,
        messages: Vec<ChatMessage>,
        options: GenerateOptions,
    ) -> Result<ModelResponse> {
        let call = MockCall::from_request(&messages, &options);
        let response = self.respond(&call).map(str::to_owned);

        debug!(
            model = %self.model_id,
            matched = response.is_some(),
            "Mock generation"
        );

        let input_tokens = saturating_u32(call.user.split_whitespace().count() as u64);
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);

        let text = response.ok_or_else(|| {
            LlmError::provider("mock", "no scripted response matched the request")
        })?;
        let output_tokens = saturating_u32(text.split_whitespace().count() as u64);

        Ok(ModelResponse::new(ChatMessage::assistant(text))
            .with_token_usage(TokenUsage::new(input_tokens, output_tokens)))
    }
}
