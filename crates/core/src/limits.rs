//! Field and request limits for feedback submissions.
//!
//! The `#[validate]` derive macro requires literal values in attributes,
//! so field limits are duplicated on `FeedbackSubmission`. Keep both in sync
//! when modifying.

// === Request Limits ===

/// Maximum request body size in bytes (64KB).
///
/// A maxed-out submission is well under 16KB even with 4-byte chars.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

// === User Field Limits (chars) ===

pub const MAX_NAME_LEN: usize = 60;

pub const MAX_EMAIL_LEN: usize = 120;

pub const MAX_MESSAGE_LEN: usize = 4000;

/// Minimum message length after sanitization.
pub const MIN_MESSAGE_LEN: usize = 4;

/// Honeypot field max length.
pub const MAX_HONEY_LEN: usize = 40;

// === App Metadata Limits (chars) ===

pub const MAX_APP_NAME_LEN: usize = 120;

pub const MAX_APP_VERSION_LEN: usize = 60;

pub const MAX_BUILD_NUMBER_LEN: usize = 60;

/// Platform identifier ("android", "ios", ...).
pub const MAX_PLATFORM_LEN: usize = 40;

pub const MAX_DEVICE_LEN: usize = 140;

pub const MAX_OS_VERSION_LEN: usize = 80;

/// BCP 47 tags like "en-US" are ~5 chars.
pub const MAX_LOCALE_LEN: usize = 16;

// === Rate Limiting ===

/// Sliding window length for per-IP rate limiting (seconds).
pub const RATE_WINDOW_SECS: u64 = 60;

/// Default requests per IP per window.
pub const DEFAULT_RATE_LIMIT_PER_MIN: i64 = 20;
