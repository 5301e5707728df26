//! Enrichment pipeline for the social collector.
//!
//! - Producer (cursor scan over unenriched users → hand-off queue)
//! - Queue (single slot, the backpressure between discovery and enrichment)
//! - Consumer (queue → FullContact → PostgreSQL)
//! - Supervisor (restarts either loop on a fault, logs metrics)

pub mod consumer;
pub mod producer;
pub mod queue;
pub mod supervisor;

pub use consumer::*;
pub use producer::*;
pub use queue::*;
pub use supervisor::*;
