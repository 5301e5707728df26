//! Unified error types for the social collector.
//!
//! Error codes are attached to every log line that swallows an error:
//! - URL_001: Malformed remote endpoint
//! - NET_001: Transport failure talking to the remote service
//! - REMOTE_001: Remote service answered with a non-200 status
//! - DECODE_001: Remote body could not be decoded
//! - DB_001: Storage query or insert failed
//! - CONFIG_001: Invalid configuration
//! - QUEUE_001: Hand-off queue closed
//! - INTERNAL_001: Anything else

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the social collector.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("response status: {status}")]
    RemoteStatus { status: u16 },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("hand-off queue closed")]
    QueueClosed,

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn invalid_url(msg: impl Into<String>) -> Self {
        Self::InvalidUrl(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn remote_status(status: u16) -> Self {
        Self::RemoteStatus { status }
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable code for structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "URL_001",
            Self::Transport(_) => "NET_001",
            Self::RemoteStatus { .. } => "REMOTE_001",
            Self::Decode(_) => "DECODE_001",
            Self::Database(_) => "DB_001",
            Self::Config(_) => "CONFIG_001",
            Self::QueueClosed => "QUEUE_001",
            Self::Internal(_) => "INTERNAL_001",
        }
    }

    /// Whether the error is tied to one call and the pipeline should move on.
    ///
    /// Non-transient errors mean the loop that hit them cannot make progress.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::RemoteStatus { .. } | Self::Decode(_) | Self::Database(_)
        )
    }

    /// Remote HTTP status, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteStatus { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
