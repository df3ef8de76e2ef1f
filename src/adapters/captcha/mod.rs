//! Captcha challenge stores.
//!
//! - `InMemoryChallengeStore` - process-local, lost on restart
//! - `RedisChallengeStore` - shared between instances, expiry enforced by Redis

mod in_memory;
mod redis;

pub use in_memory::InMemoryChallengeStore;
pub use redis::RedisChallengeStore;
