//! Shared harness for the HTTP-level integration tests.

pub mod fixtures;
pub mod mocks;
pub mod setup;
