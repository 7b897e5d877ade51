//! Feedback submission endpoint.
//!
//! Admission runs in a fixed order: shared secret (middleware), honeypot,
//! rate limit, field bounds and content, then a single send attempt.
//! Nothing is sent unless every check passes.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use mailer::OutboundEmail;
use relay_core::{
    compose,
    limits::{MAX_BODY_BYTES, RATE_WINDOW_SECS},
    FeedbackSubmission,
};
use std::time::Instant;
use telemetry::metrics;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::extractors::ClientIp;
use crate::response::{ApiError, OkResponse};
use crate::state::AppState;

/// POST /feedback - Validate a submission and forward it by email.
pub async fn feedback_handler(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<OkResponse>, ApiError> {
    let start = Instant::now();
    let submission_id = Uuid::new_v4();

    metrics().submissions_received.inc();

    // The body limit layer caps buffering at MAX_BODY_BYTES.
    let body = body.map_err(|rejection| {
        metrics().submissions_rejected.inc();
        debug!(%submission_id, error = %rejection.body_text(), "Failed to read request body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::bad_request(format!("Payload exceeds {}KB limit", MAX_BODY_BYTES / 1024))
        } else {
            ApiError::bad_request(rejection.body_text())
        }
    })?;

    let submission = FeedbackSubmission::parse(&body).map_err(|e| {
        metrics().submissions_rejected.inc();
        debug!(%submission_id, error = %e, "Failed to parse feedback payload");
        ApiError::bad_request(e.to_string())
    })?;

    // Spam gets the same answer as a real submission.
    if submission.is_spam() {
        metrics().spam_discarded.inc();
        info!(%submission_id, client_ip = %client_ip, "Honeypot filled, discarding submission");
        return Ok(Json(OkResponse::ok()));
    }

    if !state.rate_limiter.allow(&client_ip) {
        metrics().rate_limited_requests.inc();
        warn!(%submission_id, client_ip = %client_ip, "Rate limit exceeded");
        return Err(ApiError::rate_limited(
            "Too many requests",
            Some(RATE_WINDOW_SECS),
        ));
    }

    let feedback = submission.admit().map_err(|e| {
        metrics().submissions_rejected.inc();
        debug!(%submission_id, error = %e, "Submission rejected");
        ApiError::from(e)
    })?;

    let settings = &state.settings;
    let email = compose(&feedback, &client_ip, Utc::now(), &settings.subject_prefix);
    let outbound = OutboundEmail::new(&settings.from, &settings.to, email);

    let receipt = state.mailer.send(&outbound).await.map_err(|e| {
        error!(%submission_id, error = %e, "Failed to deliver feedback");
        ApiError::from(e)
    })?;

    metrics().submissions_accepted.inc();
    info!(
        %submission_id,
        client_ip = %client_ip,
        platform = %feedback.app.platform,
        message_id = receipt.id.as_deref().unwrap_or("none"),
        latency_ms = start.elapsed().as_millis() as u64,
        "Feedback delivered"
    );

    Ok(Json(OkResponse::ok()))
}
