//! Transactional email delivery for the feedback relay.

pub mod client;
pub mod config;
pub mod message;

pub use client::*;
pub use config::*;
pub use message::*;
