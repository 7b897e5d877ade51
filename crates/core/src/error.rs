//! Unified error types for the feedback relay.
//!
//! Error codes:
//! - AUTH_001: Shared secret missing or wrong
//! - RATE_001: Per-IP rate limit exceeded
//! - VALID_001-002: Validation errors
//! - MAIL_001-002: Delivery errors
//! - INTERNAL_001: Anything else

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Validation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorCode {
    /// VALID_001: Malformed body, message too short, invalid email
    InvalidContent,
    /// VALID_002: One or more fields exceed their length bound
    FieldBounds,
}

impl ValidationErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidContent => "VALID_001",
            Self::FieldBounds => "VALID_002",
        }
    }
}

/// Delivery error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryErrorCode {
    /// MAIL_001: Provider credentials are not configured
    NotConfigured,
    /// MAIL_002: Provider call failed or returned an error status
    Gateway,
}

impl DeliveryErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotConfigured => "MAIL_001",
            Self::Gateway => "MAIL_002",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotConfigured => 500,
            Self::Gateway => 502,
        }
    }
}

/// Unified error type for the feedback relay.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{message}")]
    RateLimited {
        message: String,
        retry_after: Option<u64>,
    },

    #[error("{0}")]
    Validation(String),

    #[error("invalid fields: {}", .0.join(", "))]
    InvalidFields(Vec<String>),

    #[error("{0}")]
    NotConfigured(String),

    #[error("{0}")]
    Gateway(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn rate_limited(msg: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self::RateLimited {
            message: msg.into(),
            retry_after,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_configured(msg: impl Into<String>) -> Self {
        Self::NotConfigured(msg.into())
    }

    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::RateLimited { .. } => 429,
            Self::Validation(_) => 400,
            Self::InvalidFields(_) => 400,
            Self::Serialization(_) => 400,
            Self::NotConfigured(_) => DeliveryErrorCode::NotConfigured.http_status(),
            Self::Gateway(_) => DeliveryErrorCode::Gateway.http_status(),
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code string.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "AUTH_001",
            Self::RateLimited { .. } => "RATE_001",
            Self::Validation(_) | Self::Serialization(_) => {
                ValidationErrorCode::InvalidContent.code()
            }
            Self::InvalidFields(_) => ValidationErrorCode::FieldBounds.code(),
            Self::NotConfigured(_) => DeliveryErrorCode::NotConfigured.code(),
            Self::Gateway(_) => DeliveryErrorCode::Gateway.code(),
            Self::Internal(_) => "INTERNAL_001",
        }
    }
}
