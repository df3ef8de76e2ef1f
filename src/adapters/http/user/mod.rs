//! HTTP adapter for `/api/user`: the caller's own account.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::UserView;
pub use routes::user_routes;
