//! Rate limiting port for the public endpoints.
//!
//! Fixed-window counters. A key is either the global bucket or one client
//! address, optionally narrowed to a named resource such as the suggestion
//! box, which gets its own budget per address.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Timestamp;

#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Consumes one request from the key's window if any budget is left.
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError>;

    /// Reads the key's window without consuming anything.
    async fn status(&self, key: RateLimitKey) -> Result<RateLimitStatus, RateLimitError>;

    /// Drops the key's window so the next request starts a fresh one.
    async fn reset(&self, key: RateLimitKey) -> Result<(), RateLimitError>;
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitScope {
    /// Every request the instance serves.
    Global,
    /// One client address.
    Client,
}

impl RateLimitScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateLimitScope::Global => "global",
            RateLimitScope::Client => "client",
        }
    }
}

impl fmt::Display for RateLimitScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a window counts.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct RateLimitKey {
    pub scope: RateLimitScope,
    /// Client address; `None` for the global bucket.
    pub client: Option<String>,
    /// Named budget such as `"suggestions"` or `"auth"`.
    pub resource: Option<&'static str>,
}

impl RateLimitKey {
    pub fn global() -> Self {
        Self {
            scope: RateLimitScope::Global,
            client: None,
            resource: None,
        }
    }

    pub fn client(ip: &str) -> Self {
        Self {
            scope: RateLimitScope::Client,
            client: Some(ip.to_string()),
            resource: None,
        }
    }

    pub fn client_resource(ip: &str, resource: &'static str) -> Self {
        Self {
            resource: Some(resource),
            ..Self::client(ip)
        }
    }

    /// Stable string form shared by every backend, e.g.
    /// `ratelimit:client:10.0.0.1:suggestions`.
    pub fn storage_key(&self) -> String {
        let mut key = format!("ratelimit:{}", self.scope);
        if let Some(client) = &self.client {
            key.push(':');
            key.push_str(client);
        }
        if let Some(resource) = self.resource {
            key.push(':');
            key.push_str(resource);
        }
        key
    }
}

#[derive(Debug, Clone)]
pub enum RateLimitResult {
    Allowed(RateLimitStatus),
    Denied(RateLimitDenied),
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed(_))
    }

    pub fn is_denied(&self) -> bool {
        !self.is_allowed()
    }
}

/// Budget left in the current window.
#[derive(Debug, Clone)]
pub struct RateLimitStatus {
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: Timestamp,
    pub window_secs: u32,
}

#[derive(Debug, Clone)]
pub struct RateLimitDenied {
    pub limit: u32,
    /// Always at least one second.
    pub retry_after_secs: u32,
    pub scope: RateLimitScope,
}

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("rate limiter unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_keys_distinguish_scope_client_and_resource() {
        assert_eq!(RateLimitKey::global().storage_key(), "ratelimit:global");
        assert_eq!(
            RateLimitKey::client("10.0.0.1").storage_key(),
            "ratelimit:client:10.0.0.1"
        );
        assert_eq!(
            RateLimitKey::client_resource("10.0.0.1", "suggestions").storage_key(),
            "ratelimit:client:10.0.0.1:suggestions"
        );
    }

    #[test]
    fn resource_keys_keep_the_client_scope() {
        let key = RateLimitKey::client_resource("10.1.2.3", "auth");
        assert_eq!(key.scope, RateLimitScope::Client);
        assert_eq!(key.client.as_deref(), Some("10.1.2.3"));
        assert_ne!(key, RateLimitKey::client("10.1.2.3"));
    }

    #[test]
    fn denied_result_is_not_allowed() {
        let result = RateLimitResult::Denied(RateLimitDenied {
            limit: 5,
            retry_after_secs: 30,
            scope: RateLimitScope::Client,
        });
        assert!(result.is_denied());
        assert!(!result.is_allowed());
    }
}
