//! Users awaiting enrichment.

use serde::{Deserialize, Serialize};

/// A user row as read by the cursor producer.
///
/// Ids are assigned by storage and grow monotonically, which is what makes
/// them usable as a scan cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
}

impl User {
    pub fn new(id: i64, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}
