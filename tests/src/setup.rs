//! Common test setup functions.

use collector_core::Result;
use fullcontact::{FullcontactClient, FullcontactConfig, RecordingPacer};
use postgres_store::schema::{init_schema, insert_user, truncate_all};
use postgres_store::PgStore;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::containers::TestContainers;

/// Test context with a real PostgreSQL database and an empty schema.
pub struct TestContext {
    pub containers: TestContainers,
    pub store: Arc<PgStore>,
}

impl TestContext {
    /// Start (or attach to) PostgreSQL and create the tables.
    pub async fn new() -> Self {
        let containers = TestContainers::start().await;

        let store = Arc::new(
            PgStore::connect(&containers.database)
                .await
                .expect("Failed to connect to PostgreSQL"),
        );

        init_schema(&store)
            .await
            .expect("Failed to initialize schema");
        truncate_all(&store).await.expect("Failed to clean tables");

        Self { containers, store }
    }

    /// Insert users with the given emails, returning their ids.
    pub async fn seed_users(&self, emails: &[Option<&str>]) -> Result<Vec<i64>> {
        let mut ids = Vec::with_capacity(emails.len());
        for email in emails {
            ids.push(insert_user(&self.store, *email).await?);
        }
        Ok(ids)
    }
}

/// Client pointed at `server_url` that records its pauses instead of sleeping.
pub fn recording_client(server_url: &str) -> (FullcontactClient, Arc<RecordingPacer>) {
    let pacer = Arc::new(RecordingPacer::new());
    let config = FullcontactConfig::new(format!("{}/v2/person.json", server_url), "test-key");
    let client = FullcontactClient::new(config)
        .expect("Failed to create FullContact client")
        .with_pacer(pacer.clone());
    (client, pacer)
}

/// Poll `check` until it holds or `timeout` passes.
pub async fn wait_until<F, Fut>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check().await
}
