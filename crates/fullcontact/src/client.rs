//! FullContact person lookup client.

use crate::config::FullcontactConfig;
use crate::person::Person;
use crate::rate_limit::{Pacer, RateLimitState, TokioPacer};
use async_trait::async_trait;
use collector_core::{Error, Result, Social, User};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::{Duration, Instant};
use telemetry::{health, metrics};
use tracing::{debug, warn};
use url::Url;

/// Looks up social data for one user.
///
/// `Ok(None)` means the service answered without a body to decode.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, user: &User) -> Result<Option<Social>>;
}

/// FullContact client that paces itself from the quota headers.
#[derive(Clone)]
pub struct FullcontactClient {
    http_client: reqwest::Client,
    config: FullcontactConfig,
    pacer: Arc<dyn Pacer>,
}

impl FullcontactClient {
    /// Creates a client that sleeps on the tokio timer between calls.
    pub fn new(config: FullcontactConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            config,
            pacer: Arc::new(TokioPacer),
        })
    }

    /// Replaces the pacer.
    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// Builds `<url>?email=<email>&apiKey=<key>`.
    pub fn lookup_url(&self, user: &User) -> Result<Url> {
        let mut url = Url::parse(&self.config.url)
            .map_err(|e| Error::invalid_url(format!("{}: {}", self.config.url, e)))?;

        url.query_pairs_mut()
            .clear()
            .append_pair("email", &user.email)
            .append_pair("apiKey", &self.config.api_key);

        Ok(url)
    }

    /// Performs the lookup for one user.
    pub async fn request(&self, user: &User) -> Result<Option<Social>> {
        let url = self.lookup_url(user)?;

        metrics().enrich_requests.inc();
        let start = Instant::now();

        let response = self.http_client.get(url).send().await.map_err(|e| {
            warn!(user_id = user.id, error = %e, "FullContact request failed");
            health().fullcontact.set_unhealthy(e.to_string());
            Error::transport(e.to_string())
        })?;

        metrics()
            .enrich_latency_ms
            .observe(start.elapsed().as_millis() as u64);
        health().fullcontact.set_healthy();

        let rate = RateLimitState::from_headers(response.headers());
        self.pace(user, &rate).await;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::remote_status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read body: {}", e)))?;

        if body.trim().is_empty() {
            debug!(user_id = user.id, "FullContact returned an empty body");
            return Ok(None);
        }

        let person: Person = serde_json::from_str(&body)?;
        Ok(Some(person.to_social(user.id)))
    }

    /// Base spacing first, then the exhaustion wait. The order matters.
    async fn pace(&self, user: &User, rate: &RateLimitState) {
        metrics().rate_limit_remaining.set(rate.remaining.max(0) as u64);

        self.pacer.pause(rate.base_delay()).await;

        if let Some(extra) = rate.exhaustion_delay() {
            warn!(
                user_id = user.id,
                limit = rate.limit,
                reset_secs = rate.reset,
                "FullContact quota exhausted, waiting for reset"
            );
            metrics().quota_exhausted.inc();
            self.pacer.pause(extra).await;
        }

        metrics()
            .pacing_delay_ms
            .observe(rate.pacing_delay().as_millis() as u64);
    }
}

#[async_trait]
impl Enricher for FullcontactClient {
    async fn enrich(&self, user: &User) -> Result<Option<Social>> {
        self.request(user).await
    }
}
