//! Consumer worker: drains the hand-off queue through FullContact into PostgreSQL.
//!
//! For each user:
//! 1. Enrich via the remote client (which paces itself)
//! 2. Drop results that fail validation
//! 3. Insert the rest
//!
//! A user whose call fails is dropped for this pass. It still has no
//! `social.users` row, so a later full re-scan will surface it again.

use crate::queue::HandoffQueue;
use collector_core::{InvalidSocial, Result, User};
use fullcontact::Enricher;
use postgres_store::SocialSink;
use std::sync::Arc;
use telemetry::metrics;
use tracing::{debug, error, info, warn};

/// What happened to one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A valid result was written.
    Inserted,
    /// The remote service had nothing to decode.
    NoData,
    /// The result was discarded without a write.
    Invalid(InvalidSocial),
}

/// Pulls users off the queue one at a time and enriches them.
pub struct Dispatcher {
    queue: HandoffQueue<User>,
    enricher: Arc<dyn Enricher>,
    sink: Arc<dyn SocialSink>,
}

impl Dispatcher {
    pub fn new(
        queue: HandoffQueue<User>,
        enricher: Arc<dyn Enricher>,
        sink: Arc<dyn SocialSink>,
    ) -> Self {
        Self {
            queue,
            enricher,
            sink,
        }
    }

    /// Enrich one user and persist the result when it is valid.
    pub async fn process(&self, user: &User) -> Result<Dispatch> {
        let social = match self.enricher.enrich(user).await {
            Ok(Some(social)) => social,
            Ok(None) => {
                debug!(user_id = user.id, "No enrichment data");
                metrics().enrich_no_data.inc();
                return Ok(Dispatch::NoData);
            }
            Err(e) => {
                metrics().enrich_errors.inc();
                return Err(e);
            }
        };

        if let Err(reason) = social.validate() {
            debug!(user_id = user.id, reason = %reason, "Skipping result");
            metrics().results_invalid.inc();
            return Ok(Dispatch::Invalid(reason));
        }

        match self.sink.insert_social(&social).await {
            Ok(()) => {
                metrics().results_inserted.inc();
                Ok(Dispatch::Inserted)
            }
            Err(e) => {
                metrics().insert_errors.inc();
                Err(e)
            }
        }
    }

    /// Main run loop - pop, enrich, insert.
    ///
    /// Returns only if the queue closes.
    pub async fn run(&self) -> Result<()> {
        info!("Consumer starting");

        loop {
            let user = self.queue.pop().await?;
            metrics().queue_depth.set(self.queue.len() as u64);

            if let Err(e) = self.process(&user).await {
                if e.is_transient() {
                    warn!(
                        user_id = user.id,
                        code = e.code(),
                        error = %e,
                        "Enrichment failed, dropping user for this pass"
                    );
                } else {
                    error!(
                        user_id = user.id,
                        code = e.code(),
                        error = %e,
                        "Enrichment failed, dropping user for this pass"
                    );
                }
            }
        }
    }
}
