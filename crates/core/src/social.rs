//! Enrichment results and their validity rule.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Social profile data discovered for one user.
///
/// Empty strings stand for "not found", matching the nullable-free columns
/// of `social.users`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
    pub user_id: i64,
    pub facebook_url: String,
    pub twitter_url: String,
    pub photo_url: String,
}

/// Why a result is not worth persisting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidSocial {
    /// No owning user id.
    #[error("user id not found")]
    MissingUserId,
    /// Neither a profile nor a photo URL was found.
    #[error("twitter, facebook or photo url not found")]
    NoUrls,
}

impl Social {
    /// Creates an empty result owned by `user_id`.
    pub fn for_user(user_id: i64) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }

    /// Checks the persistence invariant: a non-zero owner and at least one URL.
    pub fn validate(&self) -> Result<(), InvalidSocial> {
        if self.user_id == 0 {
            return Err(InvalidSocial::MissingUserId);
        }
        if self.facebook_url.is_empty() && self.twitter_url.is_empty() && self.photo_url.is_empty()
        {
            return Err(InvalidSocial::NoUrls);
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
