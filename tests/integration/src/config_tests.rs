//! Environment-configured client integration tests

use crate::fixtures::*;
use crate::helpers::*;
use crate::mock_provider::*;
use gateway_config::{
    ConfigError, GatewayConfig, ENV_API_KEY, ENV_BASE_URL, ENV_DEFAULT_MODEL, ENV_MAX_RETRIES,
    ENV_RATE_LIMIT_QPS, ENV_TIMEOUT_MS,
};
use gateway_sdk::{Client, SendChatOptions};
use std::collections::HashMap;
use std::time::Duration;

fn env(vars: &[(&str, String)]) -> HashMap<String, String> {
    vars.iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

fn load(vars: &HashMap<String, String>) -> Result<GatewayConfig, ConfigError> {
    GatewayConfig::from_lookup(|name| vars.get(name).cloned())
}

#[tokio::test]
async fn test_client_from_environment_values() {
    init_test_tracing();
    let provider = MockOpenRouter::start().await;
    provider.mock_completion("configured").await;

    let vars = env(&[
        (ENV_API_KEY, "sk-or-env".to_string()),
        (ENV_BASE_URL, provider.base_url()),
        (ENV_TIMEOUT_MS, "5000".to_string()),
        (ENV_RATE_LIMIT_QPS, "100".to_string()),
        (ENV_DEFAULT_MODEL, "anthropic/claude-3.5-haiku".to_string()),
    ]);
    let config = load(&vars).expect("config");
    assert_eq!(config.timeout(), Duration::from_secs(5));

    let client = Client::new(config).expect("client");
    let reply = client
        .send_chat(user_messages("hi"), SendChatOptions::new())
        .await
        .expect("reply");
    assert_eq!(reply.content, "configured");

    let requests = provider
        .server
        .received_requests()
        .await
        .expect("recording enabled");
    assert_eq!(
        requests[0]
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok()),
        Some("Bearer sk-or-env")
    );
    let body: serde_json::Value = requests[0].body_json().expect("json body");
    assert_eq!(body["model"], "anthropic/claude-3.5-haiku");
}

#[tokio::test]
async fn test_max_retries_from_environment() {
    init_test_tracing();
    let provider = MockOpenRouter::start().await;
    provider.mock_status(503, "overloaded").await;

    let vars = env(&[
        (ENV_API_KEY, "sk-or-env".to_string()),
        (ENV_BASE_URL, provider.base_url()),
        (ENV_MAX_RETRIES, "1".to_string()),
        (ENV_RATE_LIMIT_QPS, "100".to_string()),
    ]);
    let client = Client::new(load(&vars).expect("config")).expect("client");

    let err = client
        .send_chat(user_messages("hi"), SendChatOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(503));
    assert_eq!(provider.calls(), 2); // Initial + 1 retry
}

#[test]
fn test_missing_api_key_is_rejected() {
    let vars = env(&[(ENV_BASE_URL, "http://localhost:9/api/v1".to_string())]);
    assert_eq!(
        load(&vars).unwrap_err(),
        ConfigError::MissingApiKey { var: ENV_API_KEY }
    );
}

#[test]
fn test_invalid_retry_count_is_rejected() {
    let vars = env(&[
        (ENV_API_KEY, "sk-or-env".to_string()),
        (ENV_MAX_RETRIES, "many".to_string()),
    ]);
    let err = load(&vars).unwrap_err();
    assert!(err.to_string().contains(ENV_MAX_RETRIES), "{err}");
}
