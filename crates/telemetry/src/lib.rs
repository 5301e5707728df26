//! Tracing, in-process metrics, and component health for the social collector.
//!
//! There is no exporter: metrics snapshots are written to the log on an
//! interval by the worker supervisor.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
