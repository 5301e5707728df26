//! Quota signals and call pacing.
//!
//! FullContact reports its quota on every response. Rather than keeping a
//! token bucket, each call pauses long enough to spread requests evenly over
//! the quota window, and waits out the window when the quota is spent.

use async_trait::async_trait;
use collector_core::limits::{
    DEFAULT_RATE_LIMIT, DEFAULT_RATE_REMAINING, DEFAULT_RATE_RESET, QUOTA_WINDOW_SECS,
};
use reqwest::header::HeaderMap;
use std::time::Duration;

pub const LIMIT_HEADER: &str = "X-Rate-Limit-Limit";
pub const REMAINING_HEADER: &str = "X-Rate-Limit-Remaining";
pub const RESET_HEADER: &str = "X-Rate-Limit-Reset";

/// Quota state read from one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitState {
    /// Requests allowed per quota window
    pub limit: i64,
    /// Requests left in the current window
    pub remaining: i64,
    /// Seconds until the window resets
    pub reset: i64,
}

impl Default for RateLimitState {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RATE_LIMIT,
            remaining: DEFAULT_RATE_REMAINING,
            reset: DEFAULT_RATE_RESET,
        }
    }
}

fn header_i64(headers: &HeaderMap, name: &str, default: i64) -> i64 {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl RateLimitState {
    /// Reads the three quota headers, defaulting each one that is missing or garbled.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            limit: header_i64(headers, LIMIT_HEADER, DEFAULT_RATE_LIMIT),
            remaining: header_i64(headers, REMAINING_HEADER, DEFAULT_RATE_REMAINING),
            reset: header_i64(headers, RESET_HEADER, DEFAULT_RATE_RESET),
        }
    }

    /// Even spacing across the quota window: `60 / limit` whole seconds.
    pub fn base_delay(&self) -> Duration {
        let limit = if self.limit > 0 {
            self.limit
        } else {
            DEFAULT_RATE_LIMIT
        };
        Duration::from_secs((QUOTA_WINDOW_SECS / limit) as u64)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Extra wait of `reset + 1` seconds once the quota is spent.
    pub fn exhaustion_delay(&self) -> Option<Duration> {
        self.is_exhausted()
            .then(|| Duration::from_secs(self.reset.saturating_add(1).max(0) as u64))
    }

    /// Total pause applied after a call.
    pub fn pacing_delay(&self) -> Duration {
        self.base_delay() + self.exhaustion_delay().unwrap_or_default()
    }
}

/// Performs the pacing pauses.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, delay: Duration);
}

/// Pauses on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Records pauses instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingPacer {
    pauses: parking_lot::Mutex<Vec<Duration>>,
}

impl RecordingPacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pauses requested so far, in order.
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().clone()
    }

    pub fn total(&self) -> Duration {
        self.pauses.lock().iter().sum()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, delay: Duration) {
        self.pauses.lock().push(delay);
    }
}
