//! Per-IP rate limiting.

use parking_lot::Mutex;
use relay_core::limits::{DEFAULT_RATE_LIMIT_PER_MIN, RATE_WINDOW_SECS};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Admission check keyed by client identity.
///
/// The limiter is injected into `AppState`, so tests can swap in a fake.
pub trait RateLimit: Send + Sync {
    /// Record a request for `key` if it fits the budget.
    fn allow(&self, key: &str) -> bool;

    /// Drop bookkeeping for keys that have gone quiet.
    fn cleanup_stale(&self) {}

    /// Number of keys currently tracked.
    fn tracked_keys(&self) -> usize {
        0
    }
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests allowed per window. Zero or negative disables limiting.
    pub max_requests: i64,
    /// Window length
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::per_minute(DEFAULT_RATE_LIMIT_PER_MIN)
    }
}

impl RateLimitConfig {
    pub fn per_minute(max_requests: i64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(RATE_WINDOW_SECS),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.max_requests > 0
    }
}

/// Sliding-window limiter: remembers every accepted request per key for one window.
pub struct SlidingWindowLimiter {
    windows: Mutex<HashMap<String, VecDeque<Instant>>>,
    config: RateLimitConfig,
}

impl SlidingWindowLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Check and record a request for `key` at `now`.
    ///
    /// Prune, compare, and record happen under one lock so two concurrent
    /// requests cannot both take the last slot.
    pub fn allow_at(&self, key: &str, now: Instant) -> bool {
        if !self.config.is_enabled() {
            return true;
        }

        let mut windows = self.windows.lock();
        let hits = windows.entry(key.to_string()).or_default();

        // A hit exactly one window old still counts.
        while let Some(&oldest) = hits.front() {
            if now.saturating_duration_since(oldest) > self.config.window {
                hits.pop_front();
            } else {
                break;
            }
        }

        if hits.len() as i64 >= self.config.max_requests {
            return false;
        }

        hits.push_back(now);
        true
    }

    /// Remove keys whose newest hit is older than the window.
    pub fn cleanup_stale_at(&self, now: Instant) {
        let window = self.config.window;
        self.windows.lock().retain(|_, hits| {
            hits.back()
                .is_some_and(|&newest| now.saturating_duration_since(newest) <= window)
        });
    }
}

impl RateLimit for SlidingWindowLimiter {
    fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now())
    }

    fn cleanup_stale(&self) {
        self.cleanup_stale_at(Instant::now());
    }

    fn tracked_keys(&self) -> usize {
        self.windows.lock().len()
    }
}

/// Shared rate limiter state.
pub type SharedRateLimiter = Arc<dyn RateLimit>;
