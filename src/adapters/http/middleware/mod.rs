//! HTTP middleware for axum.
//!
//! - `auth` - Authentication middleware and extractors
//! - `rate_limit` - Global, per-IP and per-resource request limits
//! - `dev_detail` - Development-only error detail on 500 responses

pub mod auth;
pub mod dev_detail;
pub mod rate_limit;

pub use auth::{auth_middleware, AuthRejection, AuthState, OptionalAuth, RequireAdmin, RequireAuth};
pub use dev_detail::expose_internal_detail;
pub use rate_limit::{
    client_ip, rate_limit_middleware, resource_rate_limit, ClientIp, RateLimitRejection,
    RateLimiterState, ResourceLimit, TrustedProxies,
};
