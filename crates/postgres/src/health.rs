//! PostgreSQL health checks.

use crate::client::PgStore;
use telemetry::health;
use tracing::{debug, error};

/// Check PostgreSQL connection health and record it in the registry.
pub async fn check_connection(store: &PgStore) -> bool {
    match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(store.pool())
        .await
    {
        Ok(_) => {
            debug!("PostgreSQL connection healthy");
            health().database.set_healthy();
            true
        }
        Err(e) => {
            error!("PostgreSQL health check failed: {}", e);
            health().database.set_unhealthy(e.to_string());
            false
        }
    }
}
