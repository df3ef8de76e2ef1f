//! HTTP adapter for `/api/auth`.
//!
//! - `POST /api/auth/login`
//! - `POST /api/auth/register`
//! - `POST /api/auth/logout`
//! - `GET /api/auth/verify`
//! - `POST /api/auth/change-password`

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::auth_routes;
