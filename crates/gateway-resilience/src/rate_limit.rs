//! Request-start rate limiter.
//!
//! Spaces outbound request starts at least `1 / qps` seconds apart for the
//! whole limiter instance. Acquirers queue on a FIFO async mutex that guards
//! the last-start timestamp, so only one caller at a time reads, waits on and
//! updates it.

use gateway_core::GatewayError;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Serializing rate limiter for outbound requests
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum spacing between request starts
    min_interval: Duration,
    /// Start time of the most recent request
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter allowing `qps` request starts per second
    ///
    /// Non-positive or non-finite rates are treated as 1.
    #[must_use]
    pub fn new(qps: f64) -> Self {
        let qps = if qps.is_finite() && qps > 0.0 { qps } else { 1.0 };
        Self {
            min_interval: Duration::from_secs_f64(1.0 / qps),
            last_request: Mutex::new(None),
        }
    }

    /// Minimum spacing between request starts
    #[must_use]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait for a request slot, then record now as the latest start
    ///
    /// Returns the recorded start.
    pub async fn acquire(&self) -> Instant {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.min_interval;
            if ready_at > Instant::now() {
                trace!(
                    wait_ms = (ready_at - Instant::now()).as_millis(),
                    "Waiting for rate limit slot"
                );
                tokio::time::sleep_until(ready_at).await;
            }
        }
        let started = Instant::now();
        *last = Some(started);
        started
    }

    /// Like [`acquire`](Self::acquire), but gives up when `cancel` fires
    ///
    /// A cancelled acquirer leaves the queue without recording a start.
    ///
    /// # Errors
    /// Returns [`GatewayError::Cancelled`] if the token fires first
    pub async fn acquire_cancellable(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Instant, GatewayError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(GatewayError::Cancelled),
            started = self.acquire() => Ok(started),
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(1.0)
    }
}
