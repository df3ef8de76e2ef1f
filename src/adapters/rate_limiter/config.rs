//! Rate limit configuration types.
//!
//! Limits are resolved per key: a key naming a resource uses that
//! resource's window, otherwise the scope-wide limit applies.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::LimitsConfig;
use crate::ports::{RateLimitKey, RateLimitScope};

/// Public suggestion box submissions.
pub const SUGGESTIONS_RESOURCE: &str = "suggestions";

/// Login attempts.
pub const AUTH_RESOURCE: &str = "auth";

/// Complete rate limit configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Global rate limits (infrastructure protection).
    pub global: GlobalLimits,
    /// Per-IP rate limits.
    pub per_ip: IpLimits,
    /// Per-resource rate limits (specific endpoint limits).
    pub resources: HashMap<String, ResourceLimits>,
}

/// Global rate limits for infrastructure protection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalLimits {
    /// Maximum requests per minute globally.
    pub requests_per_minute: u32,
}

/// Per-IP rate limits for brute-force protection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpLimits {
    /// Maximum requests per minute per IP.
    pub requests_per_minute: u32,
}

/// Rate limits for a specific resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLimits {
    /// Maximum requests per window.
    pub requests_per_window: u32,
    /// Window duration in seconds.
    pub window_secs: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::from_limits(&LimitsConfig::default())
    }
}

impl RateLimitConfig {
    /// Build the limiter configuration from the application limits.
    pub fn from_limits(limits: &LimitsConfig) -> Self {
        let mut resources = HashMap::new();
        resources.insert(
            SUGGESTIONS_RESOURCE.to_string(),
            ResourceLimits {
                requests_per_window: limits.suggestions_per_window,
                window_secs: limits.suggestion_window_secs,
            },
        );
        resources.insert(
            AUTH_RESOURCE.to_string(),
            ResourceLimits {
                requests_per_window: limits.login_attempts_per_window,
                window_secs: limits.login_window_secs,
            },
        );

        Self {
            global: GlobalLimits {
                requests_per_minute: 10_000,
            },
            per_ip: IpLimits {
                requests_per_minute: 300,
            },
            resources,
        }
    }

    /// Get the limit and window for a key.
    ///
    /// Returns (limit, window_secs) tuple.
    pub fn limits_for(&self, key: &RateLimitKey) -> (u32, u32) {
        if let Some(limits) = key.resource.and_then(|r| self.resources.get(r)) {
            return (limits.requests_per_window, limits.window_secs);
        }
        match key.scope {
            RateLimitScope::Global => (self.global.requests_per_minute, 60),
            RateLimitScope::Client => (self.per_ip.requests_per_minute, 60),
        }
    }
}
