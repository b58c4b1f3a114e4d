//! The OpenAI-compatible backend against a local mock server.

use guardchat::expert::{EXPERT_INSTRUCTIONS, python_expert};
use guardchat::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "gemini-1.5-flash",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19 }
    })
}

fn config(server: &MockServer) -> ModelConfig {
    ModelConfig {
        base_url: format!("{}/v1beta/openai/", server.uri()),
        ..ModelConfig::new("test-key")
    }
}

#[tokio::test]
async fn sends_bearer_auth_and_parses_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/openai/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({ "model": "gemini-1.5-flash" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Hello from mock")))
        .expect(1)
        .mount(&server)
        .await;

    let model = config(&server).build_model().unwrap();
    let response = model
        .generate(
            vec![ChatMessage::system("be brief"), ChatMessage::user("hi")],
            GenerateOptions::new(),
        )
        .await
        .unwrap();

    assert_eq!(response.text(), Some("Hello from mock"));
    assert_eq!(response.token_usage, Some(TokenUsage::new(12, 7)));
}

#[tokio::test]
async fn structured_agents_send_json_schema() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/openai/chat/completions"))
        .and(body_partial_json(json!({
            "response_format": {
                "type": "json_schema",
                "json_schema": { "name": "Verdict" }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"on_topic": true, "reasoning": "mentions Python"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let model = config(&server).build_model().unwrap();
    let classifier = TopicClassifier::new(
        Agent::new("Input Guardrail")
            .instructions("Is this about Python?")
            .model(model),
    );

    let verdict = classifier.classify("Python lists?").await.unwrap();
    assert!(verdict.on_topic);
    assert_eq!(verdict.reasoning, "mentions Python");
}

#[tokio::test]
async fn status_codes_map_to_error_kinds() {
    let cases: [(u16, LlmErrorKind); 4] = [
        (401, LlmErrorKind::Auth),
        (403, LlmErrorKind::Auth),
        (429, LlmErrorKind::RateLimited),
        (500, LlmErrorKind::HttpStatus),
    ];

    for (status, kind) in cases {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/openai/chat/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": { "message": "nope" }
            })))
            .mount(&server)
            .await;

        let model = config(&server).build_model().unwrap();
        let err = model
            .generate(vec![ChatMessage::user("hi")], GenerateOptions::new())
            .await
            .unwrap_err();

        match err {
            Error::Llm(e) => {
                assert_eq!(e.kind, kind, "status {status}");
                assert_eq!(e.provider.as_deref(), Some("gemini"));
            }
            other => panic!("status {status}: unexpected {other:?}"),
        }
    }
}

#[tokio::test]
async fn missing_choices_is_a_format_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/openai/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let model = config(&server).build_model().unwrap();
    let err = model
        .generate(vec![ChatMessage::user("hi")], GenerateOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Llm(ref e) if e.kind == LlmErrorKind::ResponseFormat));
}

#[tokio::test]
async fn gated_expert_over_http() {
    let server = MockServer::start().await;
    let verdict = |on_topic: bool| {
        completion(&json!({ "on_topic": on_topic, "reasoning": "checked" }).to_string())
    };

    Mock::given(method("POST"))
        .and(body_string_contains("is related to Python programming"))
        .respond_with(ResponseTemplate::new(200).set_body_json(verdict(true)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains(EXPERT_INSTRUCTIONS))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "Use `sorted(items, key=len)`.",
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("includes any Python related response"))
        .respond_with(ResponseTemplate::new(200).set_body_json(verdict(true)))
        .expect(1)
        .mount(&server)
        .await;

    let handler = ChatHandler::new(python_expert(config(&server).build_model().unwrap()));
    let reply = handler
        .reply("How do I sort strings by length in Python?")
        .await
        .unwrap();

    assert_eq!(reply.kind, ReplyKind::Answer);
    assert_eq!(reply.content, "Use `sorted(items, key=len)`.");
}
