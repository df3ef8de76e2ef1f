//! HTTP adapter for `/api/accounting`.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::accounting_routes;
