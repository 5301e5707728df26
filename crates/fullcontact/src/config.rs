//! FullContact client configuration.

use collector_core::limits::REQUEST_TIMEOUT_SECS;
use serde::{Deserialize, Serialize};

/// FullContact client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullcontactConfig {
    /// Person lookup endpoint
    #[serde(default = "default_url")]
    pub url: String,
    /// API key, sent as the `apiKey` query parameter
    #[serde(rename = "key", default)]
    pub api_key: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    "https://api.fullcontact.com/v2/person.json".to_string()
}

fn default_timeout_secs() -> u64 {
    REQUEST_TIMEOUT_SECS
}

impl Default for FullcontactConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl FullcontactConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }
}
