//! Shared helpers for the social collector integration tests.

pub mod mocks;
pub mod setup;
