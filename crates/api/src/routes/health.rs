//! Health check endpoint.

use axum::Json;

use crate::response::OkResponse;

/// GET /health - Liveness probe; always `{"ok": true}`.
pub async fn health_handler() -> Json<OkResponse> {
    Json(OkResponse::ok())
}
