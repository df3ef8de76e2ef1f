//! HTTP adapter - the JSON API under `/api` plus `/health`.
//!
//! Each route group owns its DTOs, handlers and router. Cross-cutting
//! pieces (error mapping, envelope, validation, middleware) live at this
//! level and are shared by every group.

pub mod accounting;
pub mod admin;
pub mod auth;
pub mod content;
pub mod documents;
pub mod envelope;
pub mod error;
pub mod forms;
pub mod health;
pub mod middleware;
pub mod params;
pub mod payment;
pub mod router;
pub mod state;
pub mod suggestions;
pub mod user;
pub mod validation;

pub use error::ApiError;
pub use router::build_router;
pub use state::{AppState, PortalSettings};
