//! Tests for error handling in the admission pipeline.
//!
//! Every rejection must happen before any send attempt.

use api::RelaySettings;
use axum::http::StatusCode;
use integration_tests::{
    fixtures,
    mocks::{FixedLimiter, SendFailure},
    setup::{test_settings, TestContext},
};
use std::sync::Arc;

fn secured() -> TestContext {
    TestContext::with_settings(
        RelaySettings {
            shared_secret: Some(fixtures::TEST_SECRET.to_string()),
            ..test_settings()
        },
        20,
    )
}

/// Test missing X-Api-Key returns 401 when a secret is configured
#[tokio::test]
async fn test_missing_secret_returns_401() {
    let ctx = secured();
    let server = ctx.server();

    let response = server
        .post("/feedback")
        .json(&fixtures::valid_submission())
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "AUTH_001");
    assert_eq!(ctx.send_count(), 0);
}

/// Test wrong X-Api-Key returns 401
#[tokio::test]
async fn test_wrong_secret_returns_401() {
    let ctx = secured();
    let server = ctx.server();

    let response = server
        .post("/feedback")
        .add_header("X-Api-Key", "wrong")
        .json(&fixtures::valid_submission())
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.send_count(), 0);
}

/// Test the secret check runs before the honeypot check
#[tokio::test]
async fn test_secret_checked_before_honeypot() {
    let ctx = secured();
    let server = ctx.server();

    let response = server
        .post("/feedback")
        .json(&fixtures::spam_submission())
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

/// Test a 2-char message returns "Message too short"
#[tokio::test]
async fn test_short_message_returns_400() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/feedback")
        .json(&serde_json::json!({ "message": "Hi" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Message too short");
    assert_eq!(body["code"], "VALID_001");
    assert_eq!(ctx.send_count(), 0);
}

/// Test a missing message is treated as too short
#[tokio::test]
async fn test_missing_message_returns_400() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/feedback")
        .json(&serde_json::json!({ "name": "Ada" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Message too short");
}

/// Test a malformed email returns "Invalid email"
#[tokio::test]
async fn test_invalid_email_returns_400() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/feedback")
        .json(&serde_json::json!({ "message": "Hello there", "email": "not-an-email" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid email");
    assert_eq!(ctx.send_count(), 0);
}

/// Test over-long fields return VALID_002 with the field names
#[tokio::test]
async fn test_field_bounds_return_400() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let payload = fixtures::with_field(fixtures::valid_submission(), "platform", "p".repeat(41));

    let response = server.post("/feedback").json(&payload).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_002");
    assert_eq!(
        body["details"],
        serde_json::json!(["platform: exceeds maximum length"])
    );
    assert_eq!(ctx.send_count(), 0);
}

/// Test invalid JSON returns 400
#[tokio::test]
async fn test_invalid_json_returns_400() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/feedback")
        .content_type("application/json")
        .bytes("not json at all".into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_001");
}

/// Test oversized bodies are rejected before parsing
#[tokio::test]
async fn test_oversized_body_returns_400() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let payload = serde_json::json!({ "message": "x".repeat(70_000) }).to_string();

    let response = server
        .post("/feedback")
        .content_type("application/json")
        .bytes(payload.into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_001");
    assert_eq!(body["error"], "Payload exceeds 64KB limit");
    assert_eq!(ctx.send_count(), 0);
}

/// Test bodies beyond the framework buffer size get the same JSON 400
#[tokio::test]
async fn test_multi_megabyte_body_returns_400() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let payload = serde_json::json!({ "message": "x".repeat(3 * 1024 * 1024) }).to_string();

    let response = server
        .post("/feedback")
        .content_type("application/json")
        .bytes(payload.into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_001");
    assert_eq!(body["error"], "Payload exceeds 64KB limit");
    assert_eq!(ctx.send_count(), 0);
}

/// Test a JSON array is rejected instead of filling fields by position
#[tokio::test]
async fn test_json_array_returns_400() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/feedback")
        .json(&serde_json::json!(["Bob", "bob@example.com", "Hello positional"]))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Expected a JSON object");
    assert_eq!(ctx.send_count(), 0);
}

/// Test the third request inside a minute is rejected at limit 2
#[tokio::test]
async fn test_rate_limit_returns_429() {
    let ctx = TestContext::with_settings(test_settings(), 2);
    let server = ctx.server();

    for _ in 0..2 {
        server
            .post("/feedback")
            .add_header("X-Forwarded-For", "192.0.2.10")
            .json(&fixtures::minimal_submission())
            .await
            .assert_status_ok();
    }

    let response = server
        .post("/feedback")
        .add_header("X-Forwarded-For", "192.0.2.10")
        .json(&fixtures::minimal_submission())
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.header("Retry-After"), "60");
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "RATE_001");
    assert_eq!(ctx.send_count(), 2);
}

/// Test the rate limit runs before content validation
#[tokio::test]
async fn test_rate_limit_checked_before_content() {
    let ctx = TestContext::with_limiter(Arc::new(FixedLimiter::denying()));
    let server = ctx.server();

    let response = server
        .post("/feedback")
        .json(&serde_json::json!({ "message": "Hi" }))
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
}

/// Test provider failure surfaces as 502 with the reason
#[tokio::test]
async fn test_provider_failure_returns_502() {
    let ctx = TestContext::new();
    ctx.mock_sender.set_failure(Some(SendFailure::ProviderError));
    let server = ctx.server();

    let response = server
        .post("/feedback")
        .json(&fixtures::valid_submission())
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "MAIL_002");
    assert!(body["error"].as_str().unwrap().contains("500"));
    // One attempt, no retries.
    assert_eq!(ctx.send_count(), 1);
}

/// Test missing provider credentials return 500
#[tokio::test]
async fn test_missing_api_key_returns_500() {
    let ctx = TestContext::new();
    ctx.mock_sender.set_failure(Some(SendFailure::NotConfigured));
    let server = ctx.server();

    let response = server
        .post("/feedback")
        .json(&fixtures::valid_submission())
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "MAIL_001");
    assert_eq!(body["error"], "RESEND_API_KEY is not set");
}
