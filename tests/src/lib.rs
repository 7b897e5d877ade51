//! Shared helpers for the feedback relay integration tests.
