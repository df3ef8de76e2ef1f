//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Handlers depend only on port traits, so the same code runs against
//! Postgres in production and the in-memory adapters in tests.

pub mod error;
pub mod handlers;

pub use error::{ApplicationError, INVALID_CREDENTIALS};
