//! HTTP adapter for `/api/payment` and the provider webhook.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{payment_routes, webhook_routes};
