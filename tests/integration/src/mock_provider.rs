//! Mock OpenRouter provider for integration testing
//!
//! A wiremock server that answers `POST /api/v1/chat/completions` and records
//! when each request arrived.

use crate::fixtures::{chat_completion_body, error_body};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Path the client posts to
pub const CHAT_COMPLETIONS_PATH: &str = "/api/v1/chat/completions";

/// Responder that timestamps every request before answering
#[derive(Clone)]
struct Recording {
    arrivals: Arc<Mutex<Vec<Instant>>>,
    template: ResponseTemplate,
}

impl Respond for Recording {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.arrivals
            .lock()
            .expect("arrivals lock poisoned")
            .push(Instant::now());
        self.template.clone()
    }
}

/// Mock OpenRouter API server
pub struct MockOpenRouter {
    pub server: MockServer,
    arrivals: Arc<Mutex<Vec<Instant>>>,
}

impl MockOpenRouter {
    /// Start a new mock server
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            arrivals: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Base URL to configure the client with
    pub fn base_url(&self) -> String {
        format!("{}/api/v1", self.server.uri())
    }

    /// Number of chat requests received
    pub fn calls(&self) -> usize {
        self.arrivals.lock().expect("arrivals lock poisoned").len()
    }

    /// Arrival time of every chat request, in order
    pub fn arrivals(&self) -> Vec<Instant> {
        self.arrivals.lock().expect("arrivals lock poisoned").clone()
    }

    /// JSON bodies of all received requests
    pub async fn request_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| r.body_json().expect("request body is JSON"))
            .collect()
    }

    /// Answer every request with `template`
    pub async fn respond_with(&self, template: ResponseTemplate) {
        self.mount(template, None).await;
    }

    /// Answer the next `n` requests with `template`
    pub async fn respond_times(&self, template: ResponseTemplate, n: u64) {
        self.mount(template, Some(n)).await;
    }

    /// Successful completion with `content`
    pub async fn mock_completion(&self, content: &str) {
        self.respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_completion_body("openai/gpt-4o-mini", content)),
        )
        .await;
    }

    /// Successful completion after `delay`
    pub async fn mock_completion_delayed(&self, content: &str, delay: Duration) {
        self.respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_completion_body("openai/gpt-4o-mini", content))
                .set_delay(delay),
        )
        .await;
    }

    /// Error status with a provider error body
    pub async fn mock_status(&self, status: u16, message: &str) {
        self.respond_with(ResponseTemplate::new(status).set_body_json(error_body(message)))
            .await;
    }

    /// 429 with a `Retry-After` header
    pub async fn mock_rate_limited(&self, retry_after_secs: u64) {
        self.respond_with(
            ResponseTemplate::new(429)
                .set_body_json(error_body("Rate limit exceeded"))
                .insert_header("retry-after", retry_after_secs.to_string().as_str()),
        )
        .await;
    }

    async fn mount(&self, template: ResponseTemplate, times: Option<u64>) {
        let responder = Recording {
            arrivals: Arc::clone(&self.arrivals),
            template,
        };
        let mock = Mock::given(method("POST"))
            .and(path(CHAT_COMPLETIONS_PATH))
            .respond_with(responder);
        let mock = match times {
            Some(n) => mock.up_to_n_times(n),
            None => mock,
        };
        mock.mount(&self.server).await;
    }
}
