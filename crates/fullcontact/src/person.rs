//! FullContact person response schema.
//!
//! Only the fields the collector reads are modelled in detail. Every field
//! is optional; absent or `null` values fall back to empty.

use collector_core::Social;
use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Person {
    #[serde(deserialize_with = "null_as_default")]
    pub status: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub request_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub likelihood: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub contact_info: ContactInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub photos: Vec<Photo>,
    #[serde(deserialize_with = "null_as_default")]
    pub social_profiles: Vec<SocialProfile>,
    #[serde(deserialize_with = "null_as_default")]
    pub organizations: Vec<Organization>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub family_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub given_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub websites: Vec<Website>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Website {
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Photo {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub type_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub type_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_primary: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialProfile {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub type_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub type_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub bio: String,
    #[serde(deserialize_with = "null_as_default")]
    pub followers: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub following: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Organization {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub end_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_primary: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub current: bool,
}

impl Person {
    /// URL of the first profile of the given type, if any.
    pub fn profile_url(&self, kind: &str) -> Option<&str> {
        self.social_profiles
            .iter()
            .find(|p| p.kind == kind)
            .map(|p| p.url.as_str())
    }

    /// URL of the primary photo. The last one flagged primary wins.
    pub fn primary_photo_url(&self) -> Option<&str> {
        self.photos
            .iter()
            .rev()
            .find(|p| p.is_primary)
            .map(|p| p.url.as_str())
    }

    /// Projects the person onto the result owned by `user_id`.
    ///
    /// `user_id` is set even when nothing was found.
    pub fn to_social(&self, user_id: i64) -> Social {
        Social {
            user_id,
            facebook_url: self.profile_url("facebook").unwrap_or_default().to_string(),
            twitter_url: self.profile_url("twitter").unwrap_or_default().to_string(),
            photo_url: self.primary_photo_url().unwrap_or_default().to_string(),
        }
    }
}
