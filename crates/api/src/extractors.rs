//! Request extractors.

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};
use std::net::SocketAddr;

use crate::state::AppState;

/// Placeholder used when the peer address is not available.
pub const UNKNOWN_IP: &str = "unknown";

/// Client IP address, used as the rate-limit key.
///
/// Comes from the TCP peer address. Proxy headers are only honoured when
/// `trust_forwarded_for` is enabled, since clients can set them freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

#[async_trait]
impl FromRequestParts<AppState> for ClientIp {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.settings.trust_forwarded_for {
            if let Some(ip) = forwarded_ip(parts) {
                return Ok(ClientIp(ip));
            }
        }

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        Ok(ClientIp(peer.unwrap_or_else(|| UNKNOWN_IP.to_string())))
    }
}

fn forwarded_ip(parts: &Parts) -> Option<String> {
    // Take the first IP in the X-Forwarded-For chain
    let xff = parts
        .headers
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|chain| chain.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    if let Some(ip) = xff {
        return Some(ip.to_string());
    }

    parts
        .headers
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(String::from)
}
