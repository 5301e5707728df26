//! In-process pipeline metrics.
//!
//! Lock-free counters updated from the producer, consumer, and client; the
//! supervisor logs a snapshot on an interval.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// A gauge metric (can go up or down).
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn set(&self, val: u64) {
        self.0.store(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Histogram for latency and delay tracking.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 10ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s, 30s, 60s
    buckets: [AtomicU64; 11],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 11] = [
        10, 50, 100, 250, 500, 1_000, 2_500, 5_000, 10_000, 30_000, 60_000,
    ];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        let idx = Self::BUCKET_BOUNDS
            .iter()
            .position(|&bound| ms <= bound)
            .unwrap_or(Self::BUCKET_BOUNDS.len() - 1);
        self.buckets[idx].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum() as f64 / count as f64
        }
    }

    /// Returns bucket counts.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Collected metrics for the enrichment pipeline.
#[derive(Debug, Default)]
pub struct Metrics {
    // Discovery
    pub scans: Counter,
    pub scans_empty: Counter,
    pub scan_errors: Counter,
    pub users_enqueued: Counter,

    // Remote enrichment
    pub enrich_requests: Counter,
    pub enrich_errors: Counter,
    pub enrich_no_data: Counter,
    pub quota_exhausted: Counter,

    // Persistence
    pub results_invalid: Counter,
    pub results_inserted: Counter,
    pub insert_errors: Counter,

    // Supervision
    pub producer_restarts: Counter,
    pub consumer_restarts: Counter,

    // Latency histograms
    pub enrich_latency_ms: Histogram,
    pub pacing_delay_ms: Histogram,

    // Gauges
    pub queue_depth: Gauge,
    pub cursor: Gauge,
    pub rate_limit_remaining: Gauge,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub scans: u64,
    pub scans_empty: u64,
    pub scan_errors: u64,
    pub users_enqueued: u64,
    pub enrich_requests: u64,
    pub enrich_errors: u64,
    pub enrich_no_data: u64,
    pub quota_exhausted: u64,
    pub results_invalid: u64,
    pub results_inserted: u64,
    pub insert_errors: u64,
    pub producer_restarts: u64,
    pub consumer_restarts: u64,
    pub enrich_latency_mean_ms: f64,
    pub pacing_delay_mean_ms: f64,
    pub queue_depth: u64,
    pub cursor: u64,
    pub rate_limit_remaining: u64,
}

impl Metrics {
    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            scans: self.scans.get(),
            scans_empty: self.scans_empty.get(),
            scan_errors: self.scan_errors.get(),
            users_enqueued: self.users_enqueued.get(),
            enrich_requests: self.enrich_requests.get(),
            enrich_errors: self.enrich_errors.get(),
            enrich_no_data: self.enrich_no_data.get(),
            quota_exhausted: self.quota_exhausted.get(),
            results_invalid: self.results_invalid.get(),
            results_inserted: self.results_inserted.get(),
            insert_errors: self.insert_errors.get(),
            producer_restarts: self.producer_restarts.get(),
            consumer_restarts: self.consumer_restarts.get(),
            enrich_latency_mean_ms: self.enrich_latency_ms.mean(),
            pacing_delay_mean_ms: self.pacing_delay_ms.mean(),
            queue_depth: self.queue_depth.get(),
            cursor: self.cursor.get(),
            rate_limit_remaining: self.rate_limit_remaining.get(),
        }
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
