//! API routes.

pub mod feedback;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use relay_core::limits::MAX_BODY_BYTES;
use tower_http::trace::TraceLayer;

use crate::middleware::auth::require_shared_secret;
use crate::state::AppState;

/// Creates the API router.
pub fn router(state: AppState) -> Router {
    let cors = state.settings.allowed_origins.cors_layer();

    // The secret check runs before the body is read.
    let feedback = Router::new()
        .route("/feedback", post(feedback::feedback_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_shared_secret,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .merge(feedback)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
