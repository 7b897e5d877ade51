//! Core types, sanitization, validation, and composition for the feedback relay.

pub mod compose;
pub mod email;
pub mod error;
pub mod feedback;
pub mod limits;
pub mod sanitize;

pub use compose::{compose, ComposedEmail};
pub use email::is_valid_email;
pub use error::{Error, Result};
pub use feedback::*;
pub use sanitize::{clean, clean_opt};
