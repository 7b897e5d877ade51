//! Internal telemetry for the feedback relay.
//!
//! Metrics live in memory and are logged as snapshots by the maintenance task.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::*;
pub use tracing_setup::*;
