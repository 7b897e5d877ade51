//! Application state shared across handlers.

use crate::cors::AllowedOrigins;
use crate::middleware::rate_limit::{RateLimitConfig, SharedRateLimiter, SlidingWindowLimiter};
use mailer::EmailSender;
use std::sync::Arc;
use std::time::Duration;
use telemetry::metrics;
use tracing::info;

/// How often idle rate-limit entries are evicted.
pub const MAINTENANCE_INTERVAL: Duration = Duration::from_secs(300);

/// Per-deployment relay settings.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    /// Sender address, verified with the email provider
    pub from: String,
    /// Recipient of every feedback email
    pub to: String,
    pub subject_prefix: String,
    /// When set, requests must carry it in `X-Api-Key`
    pub shared_secret: Option<String>,
    pub allowed_origins: AllowedOrigins,
    /// Take the client IP from `X-Forwarded-For` / `X-Real-IP`
    pub trust_forwarded_for: bool,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            from: "noreply@example.com".to_string(),
            to: "feedback@example.com".to_string(),
            subject_prefix: "[Feedback]".to_string(),
            shared_secret: None,
            allowed_origins: AllowedOrigins::Any,
            trust_forwarded_for: false,
        }
    }
}

impl RelaySettings {
    /// Shared secret with blank values treated as unset.
    pub fn shared_secret(&self) -> Option<&str> {
        self.shared_secret
            .as_deref()
            .map(str::trim)
            .filter(|secret| !secret.is_empty())
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<RelaySettings>,
    /// Email delivery (Resend in production, mock in tests)
    pub mailer: Arc<dyn EmailSender>,
    /// Per-IP rate limiter
    pub rate_limiter: SharedRateLimiter,
}

impl AppState {
    pub fn new(
        settings: RelaySettings,
        mailer: Arc<dyn EmailSender>,
        rate_limit_per_min: i64,
    ) -> Self {
        Self::with_rate_limiter(
            settings,
            mailer,
            Arc::new(SlidingWindowLimiter::new(RateLimitConfig::per_minute(
                rate_limit_per_min,
            ))),
        )
    }

    /// Create with a custom rate limiter.
    pub fn with_rate_limiter(
        settings: RelaySettings,
        mailer: Arc<dyn EmailSender>,
        rate_limiter: SharedRateLimiter,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            mailer,
            rate_limiter,
        }
    }

    /// Start the maintenance background task: evicts idle rate-limit
    /// entries and logs a metrics snapshot.
    pub fn start_maintenance(&self) -> tokio::task::JoinHandle<()> {
        let rate_limiter = self.rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(MAINTENANCE_INTERVAL);
            loop {
                interval.tick().await;
                rate_limiter.cleanup_stale();
                metrics().tracked_ips.set(rate_limiter.tracked_keys() as u64);

                let snapshot = metrics().snapshot();
                info!(
                    received = snapshot.submissions_received,
                    accepted = snapshot.submissions_accepted,
                    spam = snapshot.spam_discarded,
                    rate_limited = snapshot.rate_limited_requests,
                    rejected = snapshot.submissions_rejected,
                    send_failures = snapshot.send_failures,
                    send_latency_mean_ms = snapshot.send_latency_mean_ms,
                    tracked_ips = snapshot.tracked_ips,
                    "Relay stats"
                );
            }
        })
    }
}
