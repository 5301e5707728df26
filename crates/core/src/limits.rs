//! Pacing and sizing constants for the enrichment pipeline.
//!
//! Worker and client configs default to these values; they are collected
//! here so tests and config defaults agree.

use std::time::Duration;

// === Discovery ===

/// Maximum users returned by one candidate scan.
pub const SCAN_BATCH_SIZE: i64 = 100;

/// Idle time between two candidate scans, whether or not the scan found work.
pub const SCAN_INTERVAL: Duration = Duration::from_secs(10);

/// Capacity of the producer → consumer hand-off queue.
///
/// One slot keeps discovery at the pace of enrichment.
pub const HANDOFF_CAPACITY: usize = 1;

// === Remote quota ===

/// Quota window the ceiling header is expressed over, in seconds.
pub const QUOTA_WINDOW_SECS: i64 = 60;

/// Ceiling assumed when `X-Rate-Limit-Limit` is missing or unparsable.
pub const DEFAULT_RATE_LIMIT: i64 = 60;

/// Remaining quota assumed when `X-Rate-Limit-Remaining` is missing or unparsable.
pub const DEFAULT_RATE_REMAINING: i64 = 60;

/// Reset seconds assumed when `X-Rate-Limit-Reset` is missing or unparsable.
pub const DEFAULT_RATE_RESET: i64 = 0;

// === Transport ===

/// Per-request timeout for the remote enrichment call, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
