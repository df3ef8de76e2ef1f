//! Rate limiter adapters.
//!
//! - `InMemoryRateLimiter` - process-local windows, for tests and single instances
//! - `RedisRateLimiter` - shared windows when Redis is configured

mod config;
mod in_memory;
mod redis;

pub use config::{
    GlobalLimits, IpLimits, RateLimitConfig, ResourceLimits, AUTH_RESOURCE, SUGGESTIONS_RESOURCE,
};
pub use in_memory::InMemoryRateLimiter;
pub use redis::RedisRateLimiter;
