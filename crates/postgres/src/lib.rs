//! PostgreSQL access for the social collector.
//!
//! Reads users still missing a `social.users` row and writes enrichment
//! results. The pipeline only sees the `UserSource` and `SocialSink` traits.

pub mod client;
pub mod config;
pub mod health;
pub mod insert;
pub mod query;
pub mod schema;
pub mod store;

pub use client::*;
pub use config::*;
pub use store::*;
