//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Argon2 password hashing and JWT sessions
//! - `captcha` - Challenge stores (in-memory, Redis)
//! - `document` - PDF rendering
//! - `email` - Resend transport and the best-effort `Notifier`
//! - `http` - Axum JSON API
//! - `memory` - In-memory repositories for tests and local runs
//! - `postgres` - PostgreSQL repositories
//! - `rate_limiter` - Fixed-window limiters (in-memory, Redis)
//! - `stripe` - Hosted checkout and webhook verification

pub mod auth;
pub mod captcha;
pub mod document;
pub mod email;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod rate_limiter;
pub mod stripe;
