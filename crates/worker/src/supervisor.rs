//! Supervisor for the producer and consumer loops.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use collector_core::limits::{SCAN_BATCH_SIZE, SCAN_INTERVAL};
use collector_core::{Result, User};
use fullcontact::Enricher;
use postgres_store::{SocialSink, UserSource};
use telemetry::{health, metrics, ComponentHealth, Counter};

use crate::consumer::Dispatcher;
use crate::producer::CursorProducer;
use crate::queue::HandoffQueue;

/// Pipeline configuration (the `worker` config section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Idle time between discovery passes
    pub scan_interval_ms: u64,
    /// Users fetched per discovery pass
    pub batch_size: i64,
    /// How often a metrics snapshot is logged
    pub metrics_log_interval_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            scan_interval_ms: SCAN_INTERVAL.as_millis() as u64,
            batch_size: SCAN_BATCH_SIZE,
            metrics_log_interval_secs: 60,
        }
    }
}

impl WorkerConfig {
    pub fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.scan_interval_ms)
    }

    pub fn metrics_log_interval(&self) -> Duration {
        Duration::from_secs(self.metrics_log_interval_secs.max(1))
    }
}

/// Owns the hand-off queue and keeps both loops alive until shutdown.
pub struct Supervisor {
    config: WorkerConfig,
    queue: HandoffQueue<User>,
    source: Arc<dyn UserSource>,
    sink: Arc<dyn SocialSink>,
    enricher: Arc<dyn Enricher>,
}

impl Supervisor {
    pub fn new(
        config: WorkerConfig,
        source: Arc<dyn UserSource>,
        sink: Arc<dyn SocialSink>,
        enricher: Arc<dyn Enricher>,
    ) -> Self {
        Self {
            config,
            queue: HandoffQueue::new(),
            source,
            sink,
            enricher,
        }
    }

    /// Spawns the supervisor onto the runtime.
    pub fn start(self: Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run(shutdown).await;
        })
    }

    /// Runs both loops plus the metrics logger until `shutdown` fires.
    ///
    /// A loop that panics, errors, or returns is restarted straight away
    /// against the same queue. The other loop is not touched.
    pub async fn run(&self, shutdown: CancellationToken) {
        info!(
            batch_size = self.config.batch_size,
            scan_interval_ms = self.config.scan_interval_ms,
            "Supervisor starting"
        );

        let producer = supervise(
            "producer",
            &shutdown,
            &health().producer,
            &metrics().producer_restarts,
            || {
                let producer =
                    CursorProducer::new(self.source.clone(), self.queue.clone(), &self.config);
                async move { producer.run().await }
            },
        );

        let consumer = supervise(
            "consumer",
            &shutdown,
            &health().consumer,
            &metrics().consumer_restarts,
            || {
                let dispatcher = Dispatcher::new(
                    self.queue.clone(),
                    self.enricher.clone(),
                    self.sink.clone(),
                );
                async move { dispatcher.run().await }
            },
        );

        tokio::join!(
            producer,
            consumer,
            log_metrics(self.config.metrics_log_interval(), &shutdown)
        );

        info!("Supervisor stopped");
    }
}

/// Keeps one loop running until shutdown, respawning it whenever it ends.
pub async fn supervise<F, Fut>(
    name: &'static str,
    shutdown: &CancellationToken,
    component: &ComponentHealth,
    restarts: &Counter,
    mut spawn_loop: F,
) where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    loop {
        let mut handle = tokio::spawn(spawn_loop());
        component.set_healthy();

        let ended = tokio::select! {
            _ = shutdown.cancelled() => None,
            res = &mut handle => Some(res),
        };

        let Some(ended) = ended else {
            handle.abort();
            let _ = handle.await;
            info!(task = name, "Stopped");
            return;
        };

        let reason = match ended {
            Ok(Ok(())) => "loop returned".to_string(),
            Ok(Err(e)) => format!("{} ({})", e, e.code()),
            Err(e) if e.is_panic() => format!("panicked: {}", panic_message(e.into_panic())),
            Err(e) => e.to_string(),
        };

        error!(task = name, reason = %reason, "Loop ended, restarting");
        component.set_unhealthy(reason);
        restarts.inc();
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

async fn log_metrics(period: Duration, shutdown: &CancellationToken) {
    let mut ticker = interval(period);
    // First tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => return,
            _ = ticker.tick() => {
                let s = metrics().snapshot();
                info!(
                    scans = s.scans,
                    users_enqueued = s.users_enqueued,
                    enrich_requests = s.enrich_requests,
                    enrich_errors = s.enrich_errors,
                    quota_exhausted = s.quota_exhausted,
                    results_inserted = s.results_inserted,
                    results_invalid = s.results_invalid,
                    insert_errors = s.insert_errors,
                    producer_restarts = s.producer_restarts,
                    consumer_restarts = s.consumer_restarts,
                    cursor = s.cursor,
                    rate_limit_remaining = s.rate_limit_remaining,
                    enrich_latency_mean_ms = s.enrich_latency_mean_ms,
                    "Pipeline metrics"
                );
            }
        }
    }
}
