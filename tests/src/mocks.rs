//! Mock implementations for testing.

use async_trait::async_trait;
use collector_core::{Error, Result, Social, User};
use fullcontact::Enricher;
use parking_lot::Mutex;
use postgres_store::{SocialSink, UserSource};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// In-memory stand-in for the PostgreSQL store.
///
/// Implements both store traits with the same filtering as the candidate
/// query: an email is required and users with a result row are skipped.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    users: Arc<Mutex<BTreeMap<i64, String>>>,
    socials: Arc<Mutex<Vec<Social>>>,
    scans: Arc<Mutex<Vec<(i64, i64)>>>,
    fail_scans: Arc<Mutex<bool>>,
    fail_inserts: Arc<Mutex<bool>>,
    panic_on_scan: Arc<Mutex<Option<usize>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with users `1..=n`.
    pub fn with_users(n: i64) -> Self {
        let store = Self::new();
        for id in 1..=n {
            store.add_user(id, &format!("user{}@test.com", id));
        }
        store
    }

    pub fn add_user(&self, id: i64, email: &str) {
        self.users.lock().insert(id, email.to_string());
    }

    /// All inserted results, in insert order.
    pub fn socials(&self) -> Vec<Social> {
        self.socials.lock().clone()
    }

    pub fn inserted_ids(&self) -> Vec<i64> {
        self.socials.lock().iter().map(|s| s.user_id).collect()
    }

    /// `(cursor, limit)` for every scan so far.
    pub fn scans(&self) -> Vec<(i64, i64)> {
        self.scans.lock().clone()
    }

    /// Set failure mode for candidate scans.
    pub fn set_fail_scans(&self, fail: bool) {
        *self.fail_scans.lock() = fail;
    }

    /// Panic during the `scan`-th scan (1-based), once.
    pub fn panic_once_on_scan(&self, scan: usize) {
        *self.panic_on_scan.lock() = Some(scan);
    }

    /// Set failure mode for inserts.
    pub fn set_fail_inserts(&self, fail: bool) {
        *self.fail_inserts.lock() = fail;
    }
}

#[async_trait]
impl UserSource for InMemoryStore {
    async fn unenriched_after(&self, cursor: i64, limit: i64) -> Result<Vec<User>> {
        let scan = {
            let mut scans = self.scans.lock();
            scans.push((cursor, limit));
            scans.len()
        };
        let should_panic = {
            let mut armed = self.panic_on_scan.lock();
            if *armed == Some(scan) {
                *armed = None;
                true
            } else {
                false
            }
        };
        if should_panic {
            panic!("scripted panic on scan {}", scan);
        }
        if *self.fail_scans.lock() {
            return Err(Error::database("Mock scan failure"));
        }

        let enriched: HashSet<i64> = self.socials.lock().iter().map(|s| s.user_id).collect();
        let users = self.users.lock();

        Ok(users
            .range(cursor + 1..)
            .filter(|(id, email)| !email.is_empty() && !enriched.contains(*id))
            .take(limit.max(0) as usize)
            .map(|(&id, email)| User::new(id, email.clone()))
            .collect())
    }
}

#[async_trait]
impl SocialSink for InMemoryStore {
    async fn insert_social(&self, social: &Social) -> Result<()> {
        if *self.fail_inserts.lock() {
            return Err(Error::database("Mock insert failure"));
        }

        let mut socials = self.socials.lock();
        if socials.iter().any(|s| s.user_id == social.user_id) {
            return Err(Error::database(format!(
                "duplicate key value violates unique constraint (user_id)={}",
                social.user_id
            )));
        }
        socials.push(social.clone());
        Ok(())
    }
}

/// Enricher that answers from a script instead of the network.
///
/// Every user gets a facebook URL unless told otherwise.
#[derive(Clone, Default)]
pub struct ScriptedEnricher {
    calls: Arc<Mutex<Vec<i64>>>,
    panic_once: Arc<Mutex<HashSet<i64>>>,
    no_data: Arc<Mutex<HashSet<i64>>>,
    empty: Arc<Mutex<HashSet<i64>>>,
    failing: Arc<Mutex<HashSet<i64>>>,
}

impl ScriptedEnricher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Panic the first time `id` is enriched.
    pub fn panic_once_on(self, id: i64) -> Self {
        self.panic_once.lock().insert(id);
        self
    }

    /// Answer `Ok(None)` for `id`.
    pub fn no_data_for(self, id: i64) -> Self {
        self.no_data.lock().insert(id);
        self
    }

    /// Answer with a result carrying no URLs for `id`.
    pub fn empty_for(self, id: i64) -> Self {
        self.empty.lock().insert(id);
        self
    }

    /// Answer with a remote 404 for `id`.
    pub fn fail_for(self, id: i64) -> Self {
        self.failing.lock().insert(id);
        self
    }

    /// User ids in call order.
    pub fn calls(&self) -> Vec<i64> {
        self.calls.lock().clone()
    }

    pub fn facebook_url(id: i64) -> String {
        format!("http://facebook.com/user{}", id)
    }
}

#[async_trait]
impl Enricher for ScriptedEnricher {
    async fn enrich(&self, user: &User) -> Result<Option<Social>> {
        self.calls.lock().push(user.id);

        let should_panic = self.panic_once.lock().remove(&user.id);
        if should_panic {
            panic!("scripted panic for user {}", user.id);
        }
        if self.failing.lock().contains(&user.id) {
            return Err(Error::remote_status(404));
        }
        if self.no_data.lock().contains(&user.id) {
            return Ok(None);
        }
        if self.empty.lock().contains(&user.id) {
            return Ok(Some(Social::for_user(user.id)));
        }

        Ok(Some(Social {
            facebook_url: Self::facebook_url(user.id),
            ..Social::for_user(user.id)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_skips_enriched_and_blank_emails() {
        let store = InMemoryStore::with_users(4);
        store.add_user(5, "");
        store
            .insert_social(&Social {
                twitter_url: "http://twitter.com/two".into(),
                ..Social::for_user(2)
            })
            .await
            .unwrap();

        let ids: Vec<i64> = store
            .unenriched_after(0, 100)
            .await
            .unwrap()
            .iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec![1, 3, 4]);

        let ids: Vec<i64> = store
            .unenriched_after(1, 1)
            .await
            .unwrap()
            .iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec![3]);
    }

    #[tokio::test]
    async fn test_store_rejects_duplicate_insert() {
        let store = InMemoryStore::new();
        let social = Social {
            photo_url: "http://img/1.png".into(),
            ..Social::for_user(1)
        };

        store.insert_social(&social).await.unwrap();
        let err = store.insert_social(&social).await.unwrap_err();
        assert_eq!(err.code(), "DB_001");
        assert_eq!(store.inserted_ids(), vec![1]);
    }

    #[tokio::test]
    async fn test_scripted_enricher_defaults_to_facebook() {
        let enricher = ScriptedEnricher::new().no_data_for(2);

        let social = enricher.enrich(&User::new(1, "a@test.com")).await.unwrap();
        assert_eq!(social.unwrap().facebook_url, ScriptedEnricher::facebook_url(1));

        assert!(enricher
            .enrich(&User::new(2, "b@test.com"))
            .await
            .unwrap()
            .is_none());
        assert_eq!(enricher.calls(), vec![1, 2]);
    }
}
