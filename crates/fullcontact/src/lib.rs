//! Rate-limited FullContact person lookup client.
//!
//! One call per user: build the lookup URL, read the quota headers, pace
//! according to them, then decode the person body into a `Social` result.

pub mod client;
pub mod config;
pub mod person;
pub mod rate_limit;

pub use client::*;
pub use config::*;
pub use rate_limit::*;
