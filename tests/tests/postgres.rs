//! PostgreSQL store tests.
//!
//! Requires Docker for the PostgreSQL testcontainer, or an existing server
//! via `SOCIAL_COLLECTOR_TEST_DATABASE_HOST`. Run with `--ignored`.

use collector_core::Social;
use integration_tests::setup::{wait_until, TestContext};
use postgres_store::insert::fetch_social;
use postgres_store::query::count_unenriched;
use postgres_store::{SocialSink, UserSource};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use worker::{Supervisor, WorkerConfig};

/// Candidates skip missing emails and enriched users, ascending past the cursor.
#[tokio::test]
#[ignore]
async fn test_candidate_query_filters_and_orders() {
    let ctx = TestContext::new().await;
    let ids = ctx
        .seed_users(&[
            Some("a@test.com"),
            None,
            Some(""),
            Some("d@test.com"),
            Some("e@test.com"),
        ])
        .await
        .unwrap();

    ctx.store
        .insert_social(&Social {
            facebook_url: "http://facebook.com/d".into(),
            ..Social::for_user(ids[3])
        })
        .await
        .unwrap();

    let users = ctx.store.unenriched_after(0, 100).await.unwrap();
    let found: Vec<i64> = users.iter().map(|u| u.id).collect();
    assert_eq!(found, vec![ids[0], ids[4]]);
    assert_eq!(users[0].email, "a@test.com");

    let users = ctx.store.unenriched_after(ids[0], 100).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, ids[4]);

    let users = ctx.store.unenriched_after(0, 1).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, ids[0]);

    assert_eq!(count_unenriched(&ctx.store).await.unwrap(), 2);
}

/// Inserted rows read back intact; a second insert for the same user fails.
#[tokio::test]
#[ignore]
async fn test_insert_and_duplicate() {
    let ctx = TestContext::new().await;
    let ids = ctx.seed_users(&[Some("a@test.com")]).await.unwrap();

    let social = Social {
        user_id: ids[0],
        facebook_url: "http://facebook.com/test".into(),
        twitter_url: "http://twitter.com/test".into(),
        photo_url: String::new(),
    };
    ctx.store.insert_social(&social).await.unwrap();

    let stored = fetch_social(&ctx.store, ids[0]).await.unwrap();
    assert_eq!(stored, Some(social.clone()));

    let err = ctx.store.insert_social(&social).await.unwrap_err();
    assert_eq!(err.code(), "DB_001");
}

/// Full pipeline against PostgreSQL with a scripted enricher.
#[tokio::test]
#[ignore]
async fn test_pipeline_writes_to_postgres() {
    use integration_tests::mocks::ScriptedEnricher;

    let ctx = TestContext::new().await;
    ctx.seed_users(&[Some("a@test.com"), Some("b@test.com"), Some("c@test.com")])
        .await
        .unwrap();

    let supervisor = Arc::new(Supervisor::new(
        WorkerConfig {
            scan_interval_ms: 50,
            ..Default::default()
        },
        ctx.store.clone(),
        ctx.store.clone(),
        Arc::new(ScriptedEnricher::new()),
    ));
    let shutdown = CancellationToken::new();
    let handle = supervisor.start(shutdown.clone());

    let store = ctx.store.clone();
    let done = wait_until(Duration::from_secs(10), || {
        let store = store.clone();
        async move { matches!(count_unenriched(&store).await, Ok(0)) }
    })
    .await;

    shutdown.cancel();
    handle.await.unwrap();

    assert!(done);
    let stored = fetch_social(&ctx.store, 1).await.unwrap().unwrap();
    assert_eq!(stored.facebook_url, ScriptedEnricher::facebook_url(1));
}
