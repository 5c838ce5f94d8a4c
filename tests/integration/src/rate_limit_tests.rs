//! Request spacing integration tests

use crate::fixtures::*;
use crate::helpers::*;
use crate::mock_provider::*;
use gateway_resilience::RateLimiter;
use gateway_sdk::SendChatOptions;
use std::sync::Arc;
use std::time::Duration;
use wiremock::ResponseTemplate;

#[tokio::test]
async fn test_send_times_are_spaced_by_shared_limiter() {
    let provider = MockOpenRouter::start().await;
    provider.mock_completion("ok").await;

    let limiter = Arc::new(RateLimiter::new(10.0));
    let client = fast_client(&provider.base_url());

    let handles: Vec<_> = (0..5)
        .map(|i| {
            let limiter = Arc::clone(&limiter);
            let client = client.clone();
            tokio::spawn(async move {
                let started = limiter.acquire().await;
                client
                    .send_chat(user_messages(&format!("call {i}")), SendChatOptions::new())
                    .await
                    .map(|_| started)
            })
        })
        .collect();

    let mut starts = Vec::new();
    for handle in handles {
        starts.push(handle.await.expect("task panicked").expect("reply"));
    }
    starts.sort();

    assert_eq!(provider.calls(), 5);
    for gap in gaps(&starts) {
        assert!(gap >= limiter.min_interval(), "gap {gap:?}");
    }
}

#[tokio::test]
async fn test_concurrent_calls_are_spaced() {
    let provider = MockOpenRouter::start().await;
    provider.mock_completion("ok").await;

    let client = client_with(&provider.base_url(), 0, 10.0, Duration::from_millis(10));

    // Opens the pooled connection so every measured request reuses it.
    client
        .send_chat(user_messages("warm up"), SendChatOptions::new())
        .await
        .expect("warm-up reply");

    let handles: Vec<_> = (0..5)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .send_chat(user_messages(&format!("call {i}")), SendChatOptions::new())
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.expect("task panicked").expect("reply");
    }

    let mut arrivals = provider.arrivals();
    arrivals.sort();
    assert_eq!(arrivals.len(), 6);
    let measured = &arrivals[1..];
    let span = measured[measured.len() - 1] - measured[0];
    assert!(span >= Duration::from_millis(400), "span {span:?}");
}

#[tokio::test]
async fn test_retries_wait_for_a_slot() {
    let provider = MockOpenRouter::start().await;
    provider
        .respond_times(
            ResponseTemplate::new(200)
                .set_body_json(chat_completion_body("openai/gpt-4o-mini", "ok")),
            1,
        )
        .await;
    provider.respond_with(ResponseTemplate::new(503)).await;

    // Backoff is far shorter than the rate-limit interval.
    let client = client_with(&provider.base_url(), 2, 4.0, Duration::from_millis(10));
    client
        .send_chat(user_messages("warm up"), SendChatOptions::new())
        .await
        .expect("warm-up reply");

    let _ = client
        .send_chat(user_messages("hi"), SendChatOptions::new())
        .await;

    let arrivals = provider.arrivals();
    assert_eq!(arrivals.len(), 4);
    let span = arrivals[3] - arrivals[1];
    assert!(span >= Duration::from_millis(500), "span {span:?}");
}

#[tokio::test]
async fn test_first_call_is_not_delayed() {
    let provider = MockOpenRouter::start().await;
    provider.mock_completion("ok").await;

    let client = client_with(&provider.base_url(), 0, 0.5, Duration::from_millis(10));
    let started = tokio::time::Instant::now();
    client
        .send_chat(user_messages("hi"), SendChatOptions::new())
        .await
        .expect("reply");

    assert!(started.elapsed() < Duration::from_secs(1));
}
