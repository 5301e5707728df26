//! Table definitions for development databases and tests.
//!
//! Production tables are owned elsewhere; these mirror the columns the
//! collector reads and writes.

use crate::client::PgStore;
use collector_core::{Error, Result};
use tracing::debug;

pub const CREATE_SCHEMAS: &[&str] = &[
    "CREATE SCHEMA IF NOT EXISTS personal_area",
    "CREATE SCHEMA IF NOT EXISTS social",
];

pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS personal_area."user" (
    id BIGSERIAL PRIMARY KEY,
    email TEXT
)
"#;

pub const CREATE_SOCIAL_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS social.users (
    user_id BIGINT PRIMARY KEY REFERENCES personal_area."user" (id),
    facebook_url TEXT NOT NULL DEFAULT '',
    twitter_url TEXT NOT NULL DEFAULT '',
    photo_url TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

/// All DDL statements in execution order.
pub fn all_statements() -> Vec<&'static str> {
    let mut statements = CREATE_SCHEMAS.to_vec();
    statements.push(CREATE_USERS_TABLE);
    statements.push(CREATE_SOCIAL_TABLE);
    statements
}

/// Create schemas and tables if missing.
pub async fn init_schema(store: &PgStore) -> Result<()> {
    for ddl in all_statements() {
        sqlx::query(ddl)
            .execute(store.pool())
            .await
            .map_err(|e| Error::database(format!("Failed to execute DDL: {}", e)))?;
    }

    debug!("PostgreSQL schema initialized");
    Ok(())
}

/// Insert a user row, returning its id (tests and seeding).
pub async fn insert_user(store: &PgStore, email: Option<&str>) -> Result<i64> {
    let (id,): (i64,) =
        sqlx::query_as(r#"INSERT INTO personal_area."user" (email) VALUES ($1) RETURNING id"#)
            .bind(email)
            .fetch_one(store.pool())
            .await
            .map_err(|e| Error::database(format!("Failed to insert user: {}", e)))?;
    Ok(id)
}

/// Remove all rows (test cleanup).
pub async fn truncate_all(store: &PgStore) -> Result<()> {
    sqlx::query(r#"TRUNCATE social.users, personal_area."user" RESTART IDENTITY"#)
        .execute(store.pool())
        .await
        .map_err(|e| Error::database(format!("Truncate error: {}", e)))?;
    Ok(())
}
