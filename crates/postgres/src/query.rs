//! Candidate discovery query.

use crate::client::PgStore;
use collector_core::{Error, Result, User};

/// Users with an email, past the cursor, and without an enrichment row.
pub const CANDIDATES_SQL: &str = r#"
SELECT u.id::BIGINT AS id, u.email
FROM personal_area."user" AS u
LEFT JOIN social.users AS su ON su.user_id = u.id
WHERE u.email IS NOT NULL
  AND u.email <> ''
  AND su.user_id IS NULL
  AND u.id > $1
ORDER BY u.id
LIMIT $2
"#;

#[derive(Debug, sqlx::FromRow)]
struct CandidateRow {
    id: i64,
    email: String,
}

impl From<CandidateRow> for User {
    fn from(row: CandidateRow) -> Self {
        User::new(row.id, row.email)
    }
}

/// Fetch up to `limit` unenriched users with `id > cursor`, ascending.
pub async fn fetch_candidates(store: &PgStore, cursor: i64, limit: i64) -> Result<Vec<User>> {
    let rows: Vec<CandidateRow> = sqlx::query_as(CANDIDATES_SQL)
        .bind(cursor)
        .bind(limit)
        .fetch_all(store.pool())
        .await
        .map_err(|e| Error::database(format!("Candidate query failed: {}", e)))?;

    Ok(rows.into_iter().map(User::from).collect())
}

/// Count users still waiting for enrichment.
pub async fn count_unenriched(store: &PgStore) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
SELECT COUNT(*)
FROM personal_area."user" AS u
LEFT JOIN social.users AS su ON su.user_id = u.id
WHERE u.email IS NOT NULL AND u.email <> '' AND su.user_id IS NULL
"#,
    )
    .fetch_one(store.pool())
    .await
    .map_err(|e| Error::database(format!("Count query failed: {}", e)))?;

    Ok(count)
}
