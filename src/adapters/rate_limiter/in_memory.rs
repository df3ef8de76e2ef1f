//! Process-local rate limiter for tests and single-instance deployments.
//!
//! Counters live in this process only, so several instances behind a load
//! balancer would each grant the full budget.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::domain::foundation::Timestamp;
use crate::ports::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter,
};

use super::config::RateLimitConfig;

#[derive(Debug)]
pub struct InMemoryRateLimiter {
    config: RateLimitConfig,
    windows: Mutex<HashMap<String, Window>>,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    /// Unix seconds.
    opened_at: u64,
    length_secs: u32,
}

impl Window {
    fn open(now: u64, length_secs: u32) -> Self {
        Self {
            count: 0,
            opened_at: now,
            length_secs,
        }
    }

    fn closes_at(&self) -> u64 {
        self.opened_at + u64::from(self.length_secs)
    }

    fn is_expired(&self, now: u64) -> bool {
        now >= self.closes_at()
    }
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        let (limit, window_secs) = self.config.limits_for(&key);
        let now = Timestamp::now().as_unix_secs();

        let mut windows = self.windows.lock().await;
        let window = windows
            .entry(key.storage_key())
            .or_insert_with(|| Window::open(now, window_secs));
        if window.is_expired(now) {
            *window = Window::open(now, window_secs);
        }

        if window.count >= limit {
            let retry_after = window.closes_at().saturating_sub(now) as u32;
            return Ok(RateLimitResult::Denied(RateLimitDenied {
                limit,
                retry_after_secs: retry_after.max(1),
                scope: key.scope,
            }));
        }

        window.count += 1;
        Ok(RateLimitResult::Allowed(RateLimitStatus {
            limit,
            remaining: limit - window.count,
            reset_at: Timestamp::from_unix_secs(window.closes_at()),
            window_secs,
        }))
    }

    async fn status(&self, key: RateLimitKey) -> Result<RateLimitStatus, RateLimitError> {
        let (limit, window_secs) = self.config.limits_for(&key);
        let now = Timestamp::now().as_unix_secs();

        let windows = self.windows.lock().await;
        let window = windows
            .get(&key.storage_key())
            .copied()
            .filter(|w| !w.is_expired(now))
            .unwrap_or_else(|| Window::open(now, window_secs));

        Ok(RateLimitStatus {
            limit,
            remaining: limit.saturating_sub(window.count),
            reset_at: Timestamp::from_unix_secs(window.closes_at()),
            window_secs,
        })
    }

    async fn reset(&self, key: RateLimitKey) -> Result<(), RateLimitError> {
        self.windows.lock().await.remove(&key.storage_key());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::rate_limiter::config::{AUTH_RESOURCE, SUGGESTIONS_RESOURCE};
    use crate::ports::RateLimitScope;

    fn limiter_with_client_limit(limit: u32) -> InMemoryRateLimiter {
        let mut config = RateLimitConfig::default();
        config.per_ip.requests_per_minute = limit;
        InMemoryRateLimiter::new(config)
    }

    #[tokio::test]
    async fn client_budget_is_enforced() {
        let limiter = limiter_with_client_limit(5);
        let key = RateLimitKey::client("192.168.1.1");

        for _ in 0..5 {
            assert!(limiter.check(key.clone()).await.unwrap().is_allowed());
        }

        match limiter.check(key).await.unwrap() {
            RateLimitResult::Denied(denied) => {
                assert_eq!(denied.limit, 5);
                assert!(denied.retry_after_secs >= 1);
                assert_eq!(denied.scope, RateLimitScope::Client);
            }
            RateLimitResult::Allowed(_) => panic!("sixth request should be denied"),
        }
    }

    #[tokio::test]
    async fn sixth_suggestion_in_an_hour_is_denied() {
        let limiter = InMemoryRateLimiter::new(RateLimitConfig::default());
        let key = RateLimitKey::client_resource("10.9.8.7", SUGGESTIONS_RESOURCE);

        for _ in 0..5 {
            assert!(limiter.check(key.clone()).await.unwrap().is_allowed());
        }
        match limiter.check(key).await.unwrap() {
            RateLimitResult::Denied(denied) => {
                assert!(denied.retry_after_secs <= 3600);
                assert!(denied.retry_after_secs > 3500);
            }
            RateLimitResult::Allowed(_) => panic!("should be denied"),
        }

        let other = RateLimitKey::client_resource("10.9.8.6", SUGGESTIONS_RESOURCE);
        assert!(limiter.check(other).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn status_does_not_consume() {
        let limiter = limiter_with_client_limit(10);
        let key = RateLimitKey::client("10.0.0.1");

        assert_eq!(limiter.status(key.clone()).await.unwrap().remaining, 10);
        for _ in 0..3 {
            limiter.check(key.clone()).await.unwrap();
        }
        assert_eq!(limiter.status(key.clone()).await.unwrap().remaining, 7);
        assert_eq!(limiter.status(key).await.unwrap().remaining, 7);
    }

    #[tokio::test]
    async fn reset_restores_the_budget() {
        let limiter = limiter_with_client_limit(2);
        let key = RateLimitKey::client("10.0.0.2");

        for _ in 0..2 {
            limiter.check(key.clone()).await.unwrap();
        }
        assert!(limiter.check(key.clone()).await.unwrap().is_denied());

        limiter.reset(key.clone()).await.unwrap();
        assert!(limiter.check(key).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn resources_have_separate_budgets() {
        let limiter = limiter_with_client_limit(1);
        let plain = RateLimitKey::client("10.0.0.3");

        assert!(limiter.check(plain.clone()).await.unwrap().is_allowed());
        assert!(limiter.check(plain).await.unwrap().is_denied());
        assert!(limiter
            .check(RateLimitKey::client_resource("10.0.0.3", SUGGESTIONS_RESOURCE))
            .await
            .unwrap()
            .is_allowed());
        assert!(limiter
            .check(RateLimitKey::client_resource("10.0.0.3", AUTH_RESOURCE))
            .await
            .unwrap()
            .is_allowed());
    }
}
