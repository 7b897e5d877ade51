//! Tests against a local stand-in for the Resend API.
//!
//! These run the real `ResendClient` over HTTP, so they cover the
//! request shape and the mapping of provider failures to 502.

use api::{router, AppState};
use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::{fixtures, mocks::StubProvider, setup::test_settings};
use mailer::{MailerConfig, ResendClient};
use std::sync::Arc;

const STUB_API_KEY: &str = "re_test_key";

fn server_for(provider: &StubProvider) -> TestServer {
    let client = ResendClient::new(MailerConfig {
        api_key: Some(STUB_API_KEY.to_string()),
        api_url: provider.url.clone(),
        timeout_secs: 5,
    })
    .expect("Failed to build Resend client");

    let state = AppState::new(test_settings(), Arc::new(client), 20);
    TestServer::new(router(state)).expect("Failed to create test server")
}

/// Test a 2xx provider answer yields {ok: true} after exactly one call
#[tokio::test]
async fn test_provider_success() {
    let provider = StubProvider::spawn(StatusCode::OK).await;
    let server = server_for(&provider);

    let response = server
        .post("/feedback")
        .json(&fixtures::valid_submission())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["ok"], true);

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);

    let call = &calls[0];
    assert_eq!(
        call.authorization.as_deref(),
        Some("Bearer re_test_key")
    );
    assert_eq!(call.body["from"], "noreply@relay.test");
    assert_eq!(call.body["to"], serde_json::json!(["team@relay.test"]));
    assert_eq!(call.body["subject"], "[Feedback] · android · v1.2.0");
    assert_eq!(call.body["reply_to"], "ada@example.com");
    assert!(call.body["text"]
        .as_str()
        .unwrap()
        .contains("Message:\nThe new search screen is great"));
    assert!(call.body["html"].as_str().unwrap().contains("<h2"));
}

/// Test reply_to is left out when no email was given
#[tokio::test]
async fn test_provider_request_without_reply_to() {
    let provider = StubProvider::spawn(StatusCode::OK).await;
    let server = server_for(&provider);

    server
        .post("/feedback")
        .json(&fixtures::minimal_submission())
        .await
        .assert_status_ok();

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].body.get("reply_to").is_none());
}

/// Test a provider 500 becomes a 502 carrying the upstream status
#[tokio::test]
async fn test_provider_error_returns_502() {
    let provider = StubProvider::spawn(StatusCode::INTERNAL_SERVER_ERROR).await;
    let server = server_for(&provider);

    let response = server
        .post("/feedback")
        .json(&fixtures::valid_submission())
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Resend error: 500"));
    assert_eq!(body["code"], "MAIL_002");

    // No retries.
    assert_eq!(provider.calls().len(), 1);
}

/// Test a provider 4xx is also reported as 502
#[tokio::test]
async fn test_provider_rejection_returns_502() {
    let provider = StubProvider::spawn(StatusCode::UNPROCESSABLE_ENTITY).await;
    let server = server_for(&provider);

    let response = server
        .post("/feedback")
        .json(&fixtures::valid_submission())
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("422"));
}

/// Test a client without an API key answers 500 and never calls out
#[tokio::test]
async fn test_missing_api_key_skips_provider() {
    let provider = StubProvider::spawn(StatusCode::OK).await;
    let client = ResendClient::new(MailerConfig {
        api_key: None,
        api_url: provider.url.clone(),
        timeout_secs: 5,
    })
    .expect("Failed to build Resend client");

    let state = AppState::new(test_settings(), Arc::new(client), 20);
    let server = TestServer::new(router(state)).expect("Failed to create test server");

    let response = server
        .post("/feedback")
        .json(&fixtures::valid_submission())
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "MAIL_001");
    assert!(provider.calls().is_empty());
}
