//! Chat round-trip integration tests

use crate::fixtures::*;
use crate::helpers::*;
use crate::mock_provider::*;
use gateway_core::{GatewayError, MessageRole};
use gateway_sdk::SendChatOptions;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;

/// One user message, one plain-text assistant reply
#[tokio::test]
async fn test_plain_text_round_trip() {
    let provider = MockOpenRouter::start().await;
    provider.mock_completion("hello").await;

    let client = fast_client(&provider.base_url());
    let reply = client
        .send_chat(user_messages("hi"), SendChatOptions::new())
        .await
        .expect("reply");

    assert_eq!(reply.content, "hello");
    assert_eq!(reply.message.role, MessageRole::Assistant);
    assert_eq!(reply.json, None);
    assert_eq!(reply.finish_reason(), Some("stop"));
    assert_eq!(provider.calls(), 1);

    let bodies = provider.request_bodies().await;
    assert_eq!(bodies[0]["model"], "openai/gpt-4o-mini");
    assert_eq!(bodies[0]["messages"], json!([{"role": "user", "content": "hi"}]));
}

#[tokio::test]
async fn test_hello_returns_validated_flashcards() {
    let provider = MockOpenRouter::start().await;
    provider
        .mock_completion(r#"{"flashcards":[{"front":"Q","back":"A"}]}"#)
        .await;

    let client = fast_client(&provider.base_url());
    let reply = client
        .send_chat(
            user_messages("hello"),
            SendChatOptions::new()
                .model("gpt-4o-mini")
                .response_format(flashcards_format()),
        )
        .await
        .expect("reply");

    assert_eq!(
        reply.json,
        Some(json!({"flashcards": [{"front": "Q", "back": "A"}]}))
    );
    assert_eq!(provider.calls(), 1);

    let bodies = provider.request_bodies().await;
    assert_eq!(bodies[0]["model"], "gpt-4o-mini");
    assert_eq!(
        bodies[0]["messages"],
        json!([{"role": "user", "content": "hello"}])
    );
    assert_eq!(bodies[0]["response_format"]["json_schema"]["name"], "flashcards");
}

#[tokio::test]
async fn test_structured_output_round_trip() {
    let provider = MockOpenRouter::start().await;
    provider
        .mock_completion(r#"{"answer": "Paris", "confidence": 0.97}"#)
        .await;

    let client = fast_client(&provider.base_url());
    let reply = client
        .send_chat(
            messages_with_system("Answer in JSON", "Capital of France?"),
            SendChatOptions::new().response_format(answer_format()),
        )
        .await
        .expect("reply");

    assert_eq!(reply.json, Some(json!({"answer": "Paris", "confidence": 0.97})));

    let bodies = provider.request_bodies().await;
    let format = &bodies[0]["response_format"];
    assert_eq!(format["type"], "json_schema");
    assert_eq!(format["json_schema"]["name"], "answer");
    assert_eq!(format["json_schema"]["strict"], true);
    assert_eq!(format["json_schema"]["schema"]["required"], json!(["answer", "confidence"]));
}

#[tokio::test]
async fn test_schema_violation_reports_field() {
    let provider = MockOpenRouter::start().await;
    provider
        .mock_completion(r#"{"answer": "Paris", "confidence": 3}"#)
        .await;

    let client = fast_client(&provider.base_url());
    let err = client
        .send_chat(
            user_messages("Capital of France?"),
            SendChatOptions::new().response_format(answer_format()),
        )
        .await
        .unwrap_err();

    let violations = err.violations();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path, "/confidence");
    assert!(err.to_string().contains("/confidence"));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_invalid_json_is_malformed() {
    let provider = MockOpenRouter::start().await;
    provider.mock_completion("Sure! Here is your JSON: {").await;

    let client = fast_client(&provider.base_url());
    let err = client
        .send_chat(
            user_messages("Capital of France?"),
            SendChatOptions::new().response_format(answer_format()),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::MalformedReply { .. }));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_empty_choices_is_malformed() {
    let provider = MockOpenRouter::start().await;
    provider
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(empty_choices_body()))
        .await;

    let client = fast_client(&provider.base_url());
    let err = client
        .send_chat(user_messages("hi"), SendChatOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err, GatewayError::malformed_reply("Reply is missing choices"));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_provider_message_is_surfaced() {
    let provider = MockOpenRouter::start().await;
    provider.mock_status(401, "No auth credentials found").await;

    let client = fast_client(&provider.base_url());
    let err = client
        .send_chat(user_messages("hi"), SendChatOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err, GatewayError::unauthorized(401, "No auth credentials found"));
}

#[tokio::test]
async fn test_default_model_change_applies_to_later_calls() {
    let provider = MockOpenRouter::start().await;
    provider.mock_completion("ok").await;

    let client = fast_client(&provider.base_url());
    client
        .send_chat(user_messages("one"), SendChatOptions::new())
        .await
        .expect("first");

    client.set_default_model("anthropic/claude-3.5-haiku");
    client
        .send_chat(user_messages("two"), SendChatOptions::new())
        .await
        .expect("second");

    client
        .send_chat(user_messages("three"), SendChatOptions::new().model("openai/gpt-4o"))
        .await
        .expect("third");

    let models: Vec<_> = provider
        .request_bodies()
        .await
        .into_iter()
        .map(|b| b["model"].as_str().map(String::from))
        .collect();
    assert_eq!(
        models,
        vec![
            Some("openai/gpt-4o-mini".to_string()),
            Some("anthropic/claude-3.5-haiku".to_string()),
            Some("openai/gpt-4o".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_slow_reply_within_timeout_succeeds() {
    let provider = MockOpenRouter::start().await;
    provider
        .mock_completion_delayed("eventually", Duration::from_millis(200))
        .await;

    let client = fast_client(&provider.base_url());
    let reply = client
        .send_chat(user_messages("hi"), SendChatOptions::new())
        .await
        .expect("reply");
    assert_eq!(reply.content, "eventually");
}
