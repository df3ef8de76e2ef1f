//! HTTP adapter for `/api/suggestions`.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::suggestion_routes;
