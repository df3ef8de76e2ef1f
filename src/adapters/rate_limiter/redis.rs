//! Redis-backed rate limiter shared by every instance.
//!
//! Each window is one counter key: `INCR`, then `EXPIRE` when the counter was
//! just created. Requests can briefly exceed the limit at window boundaries.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, RedisError};

use crate::domain::foundation::Timestamp;
use crate::ports::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter,
};

use super::config::RateLimitConfig;

#[derive(Clone)]
pub struct RedisRateLimiter {
    conn: MultiplexedConnection,
    config: RateLimitConfig,
    key_prefix: String,
}

impl RedisRateLimiter {
    pub fn new(conn: MultiplexedConnection, config: RateLimitConfig) -> Self {
        Self {
            conn,
            config,
            key_prefix: String::new(),
        }
    }

    /// Prefix every key, so several services can share one Redis.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Seconds until the window closes, falling back to the full window when
    /// the key has no expiry yet.
    async fn seconds_left(
        conn: &mut MultiplexedConnection,
        key: &str,
        window_secs: u32,
    ) -> Result<u64, RateLimitError> {
        let ttl: i64 = conn.ttl(key).await.map_err(unavailable)?;
        Ok(if ttl > 0 { ttl as u64 } else { u64::from(window_secs) })
    }
}

fn namespaced_key(prefix: &str, key: &RateLimitKey) -> String {
    if prefix.is_empty() {
        key.storage_key()
    } else {
        format!("{}:{}", prefix, key.storage_key())
    }
}

fn unavailable(err: RedisError) -> RateLimitError {
    RateLimitError::Unavailable(err.to_string())
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        let redis_key = namespaced_key(&self.key_prefix, &key);
        let (limit, window_secs) = self.config.limits_for(&key);
        let mut conn = self.conn.clone();

        let count: u64 = conn.incr(&redis_key, 1_u64).await.map_err(unavailable)?;
        if count == 1 {
            conn.expire::<_, ()>(&redis_key, i64::from(window_secs))
                .await
                .map_err(unavailable)?;
        }
        let left = Self::seconds_left(&mut conn, &redis_key, window_secs).await?;

        if count > u64::from(limit) {
            return Ok(RateLimitResult::Denied(RateLimitDenied {
                limit,
                retry_after_secs: (left as u32).max(1),
                scope: key.scope,
            }));
        }

        Ok(RateLimitResult::Allowed(RateLimitStatus {
            limit,
            remaining: limit.saturating_sub(count as u32),
            reset_at: Timestamp::from_unix_secs(Timestamp::now().as_unix_secs() + left),
            window_secs,
        }))
    }

    async fn status(&self, key: RateLimitKey) -> Result<RateLimitStatus, RateLimitError> {
        let redis_key = namespaced_key(&self.key_prefix, &key);
        let (limit, window_secs) = self.config.limits_for(&key);
        let mut conn = self.conn.clone();

        let count: Option<u64> = conn.get(&redis_key).await.map_err(unavailable)?;
        let left = Self::seconds_left(&mut conn, &redis_key, window_secs).await?;

        Ok(RateLimitStatus {
            limit,
            remaining: limit.saturating_sub(count.unwrap_or(0) as u32),
            reset_at: Timestamp::from_unix_secs(Timestamp::now().as_unix_secs() + left),
            window_secs,
        })
    }

    async fn reset(&self, key: RateLimitKey) -> Result<(), RateLimitError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(namespaced_key(&self.key_prefix, &key))
            .await
            .map_err(unavailable)
    }
}

impl std::fmt::Debug for RedisRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRateLimiter")
            .field("config", &self.config)
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}
