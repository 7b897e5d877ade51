//! Loose email address shape check.
//!
//! This is a plausibility filter for the reply-to address, not RFC 5322.

use regex::Regex;
use std::sync::LazyLock;

/// `local@domain.tld`: no whitespace or `@` in either part, a dot in the domain.
pub const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("invalid email pattern"));

/// Check whether `email` looks like an address. Surrounding whitespace is ignored.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && EMAIL_REGEX.is_match(email)
}
