//! Enrichment result persistence.

use crate::client::PgStore;
use collector_core::{Error, Result, Social};
use std::time::Instant;
use tracing::debug;

pub const INSERT_SOCIAL_SQL: &str = r#"
INSERT INTO social.users (user_id, facebook_url, twitter_url, photo_url)
VALUES ($1, $2, $3, $4)
"#;

/// Insert one enrichment row.
pub async fn insert_social(store: &PgStore, social: &Social) -> Result<()> {
    let start = Instant::now();

    sqlx::query(INSERT_SOCIAL_SQL)
        .bind(social.user_id)
        .bind(&social.facebook_url)
        .bind(&social.twitter_url)
        .bind(&social.photo_url)
        .execute(store.pool())
        .await
        .map_err(|e| {
            Error::database(format!(
                "Failed to insert social for user {}: {}",
                social.user_id, e
            ))
        })?;

    debug!(
        user_id = social.user_id,
        latency_ms = %start.elapsed().as_millis(),
        "Inserted social row"
    );

    Ok(())
}

/// Fetch the stored row for a user (verification and tests).
pub async fn fetch_social(store: &PgStore, user_id: i64) -> Result<Option<Social>> {
    let row: Option<(i64, String, String, String)> = sqlx::query_as(
        "SELECT user_id::BIGINT, facebook_url, twitter_url, photo_url FROM social.users WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(store.pool())
    .await
    .map_err(|e| Error::database(format!("Social lookup failed: {}", e)))?;

    Ok(row.map(|(user_id, facebook_url, twitter_url, photo_url)| Social {
        user_id,
        facebook_url,
        twitter_url,
        photo_url,
    }))
}
