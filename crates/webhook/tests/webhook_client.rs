//! Integration tests for the webhook client against a local mock server.
//!
//! A fast retry policy keeps the backoff delays in the millisecond range;
//! the production delay sequence itself is pinned by unit tests on
//! `RetryPolicy::delay_for`.

use std::time::Duration;

use assert_matches::assert_matches;
use serde_json::json;
use toolforge_webhook::{RetryPolicy, WebhookClient, WebhookError};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Policy with production attempt semantics but millisecond delays.
fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(20),
        attempt_timeout: Duration::from_millis(250),
    }
}

#[tokio::test]
async fn posts_json_payload_without_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"idea": "sell snow"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = WebhookClient::with_policy(fast_policy());
    let body = client
        .submit(&format!("{}/hook", server.uri()), &json!({"idea": "sell snow"}))
        .await
        .unwrap();

    assert_eq!(body, json!({"result": "ok"}));
}

#[tokio::test]
async fn retries_transient_failures_then_succeeds() {
    let server = MockServer::start().await;
    // First two attempts fail with 500, the third succeeds.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "recovered"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = WebhookClient::with_policy(fast_policy());
    let body = client.submit(&server.uri(), &json!({})).await.unwrap();

    assert_eq!(body["result"], "recovered");
    // Mock expectations assert the transport was invoked exactly 3 times.
}

#[tokio::test]
async fn client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let client = WebhookClient::with_policy(fast_policy());
    let err = client.submit(&server.uri(), &json!({})).await.unwrap_err();

    assert_matches!(err, WebhookError::Status { status: 400, .. });
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn server_errors_exhaust_the_attempt_budget() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let client = WebhookClient::with_policy(fast_policy());
    let err = client.submit(&server.uri(), &json!({})).await.unwrap_err();

    assert_matches!(err, WebhookError::Status { status: 503, .. });
}

#[tokio::test]
async fn timeouts_are_classified_and_exhaust_attempts() {
    let server = MockServer::start().await;
    // Every response arrives after the per-attempt timeout.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .expect(3)
        .mount(&server)
        .await;

    let client = WebhookClient::with_policy(fast_policy());
    let err = client.submit(&server.uri(), &json!({})).await.unwrap_err();

    assert_matches!(err, WebhookError::Timeout(_));
}

#[tokio::test]
async fn undecodable_body_is_retried_like_other_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .expect(3)
        .mount(&server)
        .await;

    let client = WebhookClient::with_policy(fast_policy());
    let err = client.submit(&server.uri(), &json!({})).await.unwrap_err();

    assert_matches!(err, WebhookError::Decode(_));
}

#[tokio::test]
async fn unreachable_host_surfaces_network_error() {
    // Nothing listens on this port; connection is refused immediately.
    let client = WebhookClient::with_policy(fast_policy());
    let err = client
        .submit("http://127.0.0.1:9/hook", &json!({}))
        .await
        .unwrap_err();

    assert_matches!(err, WebhookError::Network(_) | WebhookError::Timeout(_));
}
