//! Core types, validation, and errors for the social collector.

pub mod error;
pub mod limits;
pub mod social;
pub mod user;

pub use error::{Error, Result};
pub use social::*;
pub use user::*;
