//! Per-call options for chat requests.

use gateway_core::ResponseFormat;
use tokio_util::sync::CancellationToken;

/// Options for a single [`send_chat`](crate::Client::send_chat) call.
///
/// Every field is optional; unset sampling parameters are omitted from the
/// wire payload and an unset model falls back to the configured default.
#[derive(Debug, Clone, Default)]
pub struct SendChatOptions {
    /// Model override.
    pub model: Option<String>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Structured output format to request and validate.
    pub response_format: Option<ResponseFormat>,
    /// Cancels the call, including queued rate-limit waits and backoff sleeps.
    pub cancel: Option<CancellationToken>,
}

impl SendChatOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model to use.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature.
    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set max tokens.
    #[must_use]
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the response format.
    #[must_use]
    pub fn response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    /// Attach a cancellation token.
    #[must_use]
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}
