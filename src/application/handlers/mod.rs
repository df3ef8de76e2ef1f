//! Command and query handlers.
//!
//! Each handler owns the ports it needs and exposes a single `handle`
//! method. Plain CRUD that maps one-to-one onto a repository call stays in
//! the HTTP layer.

pub mod accounting;
pub mod admin;
pub mod auth;
pub mod documents;
pub mod payment;
pub mod submissions;
pub mod suggestions;

#[cfg(test)]
pub(crate) mod test_support;
