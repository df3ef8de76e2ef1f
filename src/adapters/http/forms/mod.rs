//! HTTP adapter for the public forms guarded by the captcha.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::form_routes;
