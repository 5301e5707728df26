//! Storage seams used by the pipeline.

use crate::client::PgStore;
use async_trait::async_trait;
use collector_core::{Result, Social, User};

/// Source of users that still lack an enrichment result.
#[async_trait]
pub trait UserSource: Send + Sync {
    /// Up to `limit` users with `id > cursor`, ascending by id.
    async fn unenriched_after(&self, cursor: i64, limit: i64) -> Result<Vec<User>>;
}

/// Destination for valid enrichment results.
#[async_trait]
pub trait SocialSink: Send + Sync {
    async fn insert_social(&self, social: &Social) -> Result<()>;
}

#[async_trait]
impl UserSource for PgStore {
    async fn unenriched_after(&self, cursor: i64, limit: i64) -> Result<Vec<User>> {
        crate::query::fetch_candidates(self, cursor, limit).await
    }
}

#[async_trait]
impl SocialSink for PgStore {
    async fn insert_social(&self, social: &Social) -> Result<()> {
        crate::insert::insert_social(self, social).await
    }
}
