//! HTTP adapter for `/api/admin`.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::admin_routes;
