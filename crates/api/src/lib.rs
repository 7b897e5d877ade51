//! HTTP API layer for the feedback relay.

pub mod cors;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use cors::AllowedOrigins;
pub use routes::router;
pub use state::{AppState, RelaySettings};
