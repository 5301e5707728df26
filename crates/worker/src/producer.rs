//! Cursor producer: discovers unenriched users and feeds the hand-off queue.
//!
//! Each pass asks storage for the next batch past the cursor, pushes the
//! users one by one (waiting on the single-slot queue), then idles. An empty
//! pass resets the cursor so the next pass starts over from the lowest id.

use crate::queue::HandoffQueue;
use crate::supervisor::WorkerConfig;
use collector_core::{Result, User};
use postgres_store::UserSource;
use std::sync::Arc;
use std::time::Duration;
use telemetry::metrics;
use tracing::{debug, error, info};

/// Scans storage in ascending id order and emits onto the queue.
pub struct CursorProducer {
    source: Arc<dyn UserSource>,
    queue: HandoffQueue<User>,
    batch_size: i64,
    scan_interval: Duration,
}

impl CursorProducer {
    pub fn new(
        source: Arc<dyn UserSource>,
        queue: HandoffQueue<User>,
        config: &WorkerConfig,
    ) -> Self {
        Self {
            source,
            queue,
            batch_size: config.batch_size,
            scan_interval: config.scan_interval(),
        }
    }

    /// One discovery pass; returns the next cursor.
    ///
    /// Storage errors are logged and leave the cursor where it was. Only a
    /// closed queue is returned as an error.
    pub async fn scan(&self, cursor: i64) -> Result<i64> {
        metrics().scans.inc();

        let users = match self.source.unenriched_after(cursor, self.batch_size).await {
            Ok(users) => users,
            Err(e) => {
                error!(code = e.code(), cursor = cursor, error = %e, "Candidate scan failed");
                metrics().scan_errors.inc();
                return Ok(cursor);
            }
        };

        let Some(last_id) = users.last().map(|u| u.id) else {
            debug!(cursor = cursor, "No unenriched users, resetting cursor");
            metrics().scans_empty.inc();
            return Ok(0);
        };

        let count = users.len();
        for user in users {
            self.queue.push(user).await?;
            metrics().users_enqueued.inc();
            metrics().queue_depth.set(self.queue.len() as u64);
        }

        debug!(count = count, cursor = last_id, "Enqueued users");
        Ok(last_id)
    }

    /// Scans forever from cursor zero, idling between passes.
    pub async fn run(&self) -> Result<()> {
        info!(
            batch_size = self.batch_size,
            scan_interval_ms = %self.scan_interval.as_millis(),
            "Producer starting"
        );

        let mut cursor = 0;
        loop {
            cursor = self.scan(cursor).await?;
            metrics().cursor.set(cursor as u64);
            tokio::time::sleep(self.scan_interval).await;
        }
    }
}
