//! Shared-secret authentication middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use telemetry::metrics;
use tracing::warn;

use crate::response::ApiError;
use crate::state::AppState;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Reject requests whose `X-Api-Key` does not match the configured secret.
///
/// A no-op when no secret is configured.
pub async fn require_shared_secret(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(secret) = state.settings.shared_secret() {
        let provided = request
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .unwrap_or_default();

        if provided != secret {
            metrics().unauthorized_requests.inc();
            warn!(has_key = !provided.is_empty(), "Rejected request with bad shared secret");
            return Err(ApiError::unauthorized("Unauthorized"));
        }
    }

    Ok(next.run(request).await)
}
