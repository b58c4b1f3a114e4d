//! `OpenAI` Chat Completions API implementation.
//!
//! Implements the [`Model`] trait for `POST {base_url}/chat/completions`.

use super::client::OpenAIClient;
use crate::error::{LlmError, Result};
use crate::message::{ChatMessage, MessageRole};
use crate::providers::{
    ApiClient, GenerateOptions, Model, ModelResponse, TokenUsage, saturating_u32,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};
use tracing::{debug, instrument};

/// `OpenAI`-compatible chat completion model.
#[derive(Clone)]
pub struct CompletionModel {
    client: OpenAIClient,
    model_id: String,
}

impl std::fmt::Debug for CompletionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionModel")
            .field("provider", &self.client.provider_name())
            .field("model_id", &self.model_id)
            .finish_non_exhaustive()
    }
}

impl CompletionModel {
    /// Create a new completion model.
    pub(crate) fn new(client: OpenAIClient, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    /// Build the request body for the API.
    fn build_request_body(&self, messages: &[ChatMessage], options: &GenerateOptions) -> Value {
        let api_messages: Vec<Value> = messages
            .iter()
            .map(|msg| {
                json!({
                    "role": msg.role.as_str(),
                    "content": msg.text().unwrap_or_default(),
                })
            })
            .collect();

        let mut body = json!({
            "model": self.model_id,
            "messages": api_messages,
        });

        if let Some(temp) = options.temperature {
            body["temperature"] = json!(temp);
        }

        if let Some(max_tokens) = options.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        if let Some(format) = &options.response_format {
            body["response_format"] = format.clone();
        }

        body
    }

    /// Parse the API response into a [`ModelResponse`].
    fn parse_response(&self, json: Value) -> Result<ModelResponse> {
        let message_json = &json["choices"][0]["message"];
        if message_json.is_null() {
            return Err(LlmError::response_format("a completion choice", json.to_string())
                .with_provider(self.client.provider_name())
                .into());
        }

        let message = ChatMessage {
            role: MessageRole::Assistant,
            content: message_json["content"].as_str().map(String::from),
        };

        let token_usage = json.get("usage").map(|usage| TokenUsage {
            input_tokens: saturating_u32(usage["prompt_tokens"].as_u64().unwrap_or(0)),
            output_tokens: saturating_u32(usage["completion_tokens"].as_u64().unwrap_or(0)),
        });

        Ok(ModelResponse {
            message,
            token_usage,
            raw: Some(json),
        })
    }

    /// Map a non-success HTTP status to an [`LlmError`].
    fn status_error(&self, status: StatusCode, body: String) -> LlmError {
        let provider = self.client.provider_name();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::auth(provider, body),
            StatusCode::TOO_MANY_REQUESTS => LlmError::rate_limited(provider),
            _ => LlmError::http_status(status.as_u16(), body).with_provider(provider),
        }
    }
}

#[async_trait]
impl Model for CompletionModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn provider(&self) -> &str {
        self.client.provider_name()
    }

    #[instrument(skip(self, messages, options), fields(model = %self.model_id))]
    async fn generate(
        &self,
        messages: Vec<ChatMessage>,
        options: GenerateOptions,
    ) -> Result<ModelResponse> {
        let body = self.build_request_body(&messages, &options);
        let url = self.client.endpoint("chat/completions");

        debug!(
            %url,
            structured = options.is_structured(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .http_client()
            .post(&url)
            .headers(self.client.auth_headers())
            .json(&body)
            .send()
            .await
            .map_err(LlmError::from)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(self.status_error(status, error_text).into());
        }

        let json: Value = response.json().await.map_err(LlmError::from)?;
        debug!(response = %json, "Chat completion response");
        self.parse_response(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, LlmErrorKind};

    fn model() -> CompletionModel {
        OpenAIClient::gemini("test-key")
            .unwrap()
            .completion_model("gemini-1.5-flash")
    }

    #[test]
    fn test_request_body_plain() {
        let messages = vec![ChatMessage::system("be brief"), ChatMessage::user("hi")];
        let body = model().build_request_body(&messages, &GenerateOptions::new());

        assert_eq!(body["model"], "gemini-1.5-flash");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert!(body.get("response_format").is_none());
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_request_body_structured() {
        let format = json!({"type": "json_schema", "json_schema": {"name": "Verdict"}});
        let options = GenerateOptions::new()
            .with_temperature(0.0)
            .with_response_format(format.clone());
        let body = model().build_request_body(&[ChatMessage::user("hi")], &options);

        assert_eq!(body["response_format"], format);
        assert_eq!(body["temperature"], 0.0);
    }

    #[test]
    fn test_parse_response() {
        let raw = json!({
            "choices": [{"message": {"role": "assistant", "content": "Use reversed()."}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 4}
        });
        let response = model().parse_response(raw).unwrap();

        assert_eq!(response.text(), Some("Use reversed()."));
        assert_eq!(response.token_usage, Some(TokenUsage::new(12, 4)));
        assert!(response.raw.is_some());
    }

    #[test]
    fn test_parse_response_without_choices() {
        let err = model().parse_response(json!({"choices": []})).unwrap_err();
        match err {
            Error::Llm(e) => assert_eq!(e.kind, LlmErrorKind::ResponseFormat),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_status_error_mapping() {
        let m = model();
        assert_eq!(
            m.status_error(StatusCode::UNAUTHORIZED, String::new()).kind,
            LlmErrorKind::Auth
        );
        assert_eq!(
            m.status_error(StatusCode::TOO_MANY_REQUESTS, String::new())
                .kind,
            LlmErrorKind::RateLimited
        );
        let err = m.status_error(StatusCode::BAD_GATEWAY, "upstream".into());
        assert_eq!(err.kind, LlmErrorKind::HttpStatus);
        assert_eq!(err.provider.as_deref(), Some("gemini"));
    }
}
