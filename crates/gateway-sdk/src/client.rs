//! HTTP client for OpenAI-compatible chat completion APIs.

use crate::classify;
use crate::options::SendChatOptions;
use crate::parser;
use gateway_config::GatewayConfig;
use gateway_core::{
    ChatMessage, ChatReply, ChatRequest, GatewayError, GatewayResult, MessageRole, ParsedReply,
    ResponseFormat,
};
use gateway_resilience::{RateLimiter, RetryConfig, RetryPolicy};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};
use url::Url;

const DEFAULT_USER_AGENT: &str = concat!("flashcard-gateway/", env!("CARGO_PKG_VERSION"));

/// Chat completion client.
///
/// Cloning is cheap; clones share the HTTP connection pool, configuration and
/// rate limiter, so request spacing holds across every clone.
///
/// # Example
///
/// ```rust,no_run
/// use gateway_sdk::{Client, SendChatOptions};
/// use gateway_core::ChatMessage;
///
/// # async fn example() -> Result<(), gateway_core::GatewayError> {
/// let client = Client::from_env()?;
/// let reply = client
///     .send_chat(vec![ChatMessage::user("hi")], SendChatOptions::new())
///     .await?;
/// println!("{}", reply.content);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    config: Arc<GatewayConfig>,
    endpoint: Url,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
}

impl Client {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client from a loaded configuration.
    ///
    /// # Errors
    /// Returns `Configuration` if the HTTP client cannot be built
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let retry = RetryConfig {
            max_retries: config.max_retries(),
            ..RetryConfig::default()
        };
        Self::with_retry_config(config, retry)
    }

    /// Create a client from `OPENROUTER_*` environment variables.
    ///
    /// # Errors
    /// Returns `Configuration` if the API key is missing or a variable is invalid
    pub fn from_env() -> GatewayResult<Self> {
        let config =
            GatewayConfig::from_env().map_err(|e| GatewayError::configuration(e.to_string()))?;
        Self::new(config)
    }

    fn with_retry_config(config: GatewayConfig, retry: RetryConfig) -> GatewayResult<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key()))
            .map_err(|e| GatewayError::configuration(format!("Invalid API key: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| {
                GatewayError::configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        // Url::join would drop the last path segment of e.g. ".../api/v1".
        let endpoint = format!(
            "{}/chat/completions",
            config.base_url().as_str().trim_end_matches('/')
        );
        let endpoint = Url::parse(&endpoint)
            .map_err(|e| {
                GatewayError::configuration(format!("Invalid endpoint '{endpoint}': {e}"))
            })?;

        Ok(Self {
            http,
            limiter: Arc::new(RateLimiter::new(config.rate_limit_qps())),
            config: Arc::new(config),
            endpoint,
            retry: RetryPolicy::new(retry),
        })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The chat completions URL requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Current default model.
    pub fn default_model(&self) -> String {
        self.config.default_model()
    }

    /// Change the model used by calls that do not name one.
    ///
    /// Calls already in flight keep the model they resolved.
    pub fn set_default_model(&self, model: impl Into<String>) {
        self.config.set_default_model(model);
    }

    /// Build a chat message.
    pub fn build_message(role: MessageRole, content: impl Into<String>) -> ChatMessage {
        ChatMessage::new(role, content)
    }

    /// Send a chat completion request.
    ///
    /// Each attempt waits for a rate-limit slot, then posts the request.
    /// Transient failures (429, 5xx, timeouts) are retried with exponential
    /// backoff; the reply of the first successful attempt is parsed and, when
    /// a JSON-schema response format was given, validated.
    ///
    /// # Errors
    /// - `InvalidRequest` if `messages` is empty
    /// - the classified provider or transport error of the final attempt
    /// - `MalformedReply` or `SchemaViolation` from parsing
    /// - `Cancelled` if the options' token fires first
    #[instrument(skip(self, messages, options), fields(messages = messages.len()))]
    pub async fn send_chat(
        &self,
        messages: Vec<ChatMessage>,
        options: SendChatOptions,
    ) -> GatewayResult<ParsedReply> {
        if messages.is_empty() {
            return Err(GatewayError::invalid_request("Messages must not be empty"));
        }

        let SendChatOptions {
            model,
            temperature,
            max_tokens,
            response_format,
            cancel,
        } = options;

        let model = model.unwrap_or_else(|| self.config.default_model());
        let cancel = cancel.unwrap_or_else(CancellationToken::new);

        let request = ChatRequest::new(model, messages)
            .with_response_format(response_format)
            .with_temperature(temperature)
            .with_max_tokens(max_tokens);

        debug!(
            model = %request.model,
            endpoint = %self.endpoint,
            "Sending chat completion request"
        );

        let request = &request;
        let format = request.response_format.as_ref();
        self.retry
            .execute(&cancel, move |attempt| self.attempt(request, format, attempt))
            .await
    }

    async fn attempt(
        &self,
        request: &ChatRequest,
        format: Option<&ResponseFormat>,
        attempt: u32,
    ) -> GatewayResult<ParsedReply> {
        self.limiter.acquire().await;
        debug!(attempt, "Posting chat completion");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| classify::transport_error(&e, self.config.timeout()))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = classify::retry_after(response.headers());
            let body = response.text().await.unwrap_or_default();
            return Err(classify::status_error(status.as_u16(), retry_after, &body));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| classify::transport_error(&e, self.config.timeout()))?;

        let reply: ChatReply = serde_json::from_slice(&body).map_err(|e| {
            GatewayError::malformed_reply(format!("Failed to decode chat completion: {e}"))
        })?;

        parser::parse_reply(reply, format)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint.as_str())
            .field("default_model", &self.config.default_model())
            .field("timeout", &self.config.timeout())
            .field("max_retries", &self.retry.config().max_retries)
            .field("min_interval", &self.limiter.min_interval())
            .finish_non_exhaustive()
    }
}

/// Builder for creating a [`Client`].
#[derive(Debug, Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
    rate_limit_qps: Option<f64>,
    default_model: Option<String>,
    retry_base_delay: Option<Duration>,
}

impl ClientBuilder {
    /// Create a new client builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the per-attempt timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the maximum number of retries.
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set the request rate in queries per second.
    #[must_use]
    pub fn rate_limit_qps(mut self, qps: f64) -> Self {
        self.rate_limit_qps = Some(qps);
        self
    }

    /// Set the default model.
    #[must_use]
    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    /// Set the delay before the first retry.
    #[must_use]
    pub fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = Some(delay);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    /// Returns `Configuration` if the API key is missing or empty, or the
    /// base URL or timeout is invalid
    pub fn build(self) -> GatewayResult<Client> {
        let api_key = self
            .api_key
            .ok_or_else(|| GatewayError::configuration("API key is required"))?;
        let mut config =
            GatewayConfig::new(api_key).map_err(|e| GatewayError::configuration(e.to_string()))?;

        if let Some(base_url) = self.base_url {
            let url = Url::parse(&base_url).map_err(|e| {
                GatewayError::configuration(format!("Invalid base URL '{base_url}': {e}"))
            })?;
            config = config.with_base_url(url);
        }
        if let Some(timeout) = self.timeout {
            if timeout.is_zero() {
                return Err(GatewayError::configuration("Timeout must be positive"));
            }
            config = config.with_timeout(timeout);
        }
        if let Some(max_retries) = self.max_retries {
            config = config.with_max_retries(max_retries);
        }
        if let Some(qps) = self.rate_limit_qps {
            config = config.with_rate_limit_qps(qps);
        }
        if let Some(model) = self.default_model {
            config = config.with_default_model(model);
        }

        let mut retry = RetryConfig {
            max_retries: config.max_retries(),
            ..RetryConfig::default()
        };
        if let Some(delay) = self.retry_base_delay {
            retry.base_delay = delay;
        }

        Client::with_retry_config(config, retry)
    }
}
