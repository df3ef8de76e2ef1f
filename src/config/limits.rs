//! Abuse limits for the public endpoints.

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::captcha::DEFAULT_MAX_ATTEMPTS;

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Suggestions accepted per IP address per window
    #[serde(default = "default_suggestions_per_window")]
    pub suggestions_per_window: u32,

    #[serde(default = "default_suggestion_window_secs")]
    pub suggestion_window_secs: u32,

    /// Login attempts accepted per IP address per window
    #[serde(default = "default_login_attempts_per_window")]
    pub login_attempts_per_window: u32,

    #[serde(default = "default_login_window_secs")]
    pub login_window_secs: u32,

    #[serde(default = "default_captcha_ttl_secs")]
    pub captcha_ttl_secs: u64,

    #[serde(default = "default_captcha_max_attempts")]
    pub captcha_max_attempts: u32,
}

impl LimitsConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.suggestions_per_window == 0 || self.suggestion_window_secs == 0 {
            return Err(ValidationError::InvalidLimit("suggestions"));
        }
        if self.login_attempts_per_window == 0 || self.login_window_secs == 0 {
            return Err(ValidationError::InvalidLimit("login"));
        }
        if self.captcha_ttl_secs == 0 || self.captcha_max_attempts == 0 {
            return Err(ValidationError::InvalidLimit("captcha"));
        }
        Ok(())
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            suggestions_per_window: default_suggestions_per_window(),
            suggestion_window_secs: default_suggestion_window_secs(),
            login_attempts_per_window: default_login_attempts_per_window(),
            login_window_secs: default_login_window_secs(),
            captcha_ttl_secs: default_captcha_ttl_secs(),
            captcha_max_attempts: default_captcha_max_attempts(),
        }
    }
}

fn default_suggestions_per_window() -> u32 {
    5
}

fn default_suggestion_window_secs() -> u32 {
    3600
}

fn default_login_attempts_per_window() -> u32 {
    10
}

fn default_login_window_secs() -> u32 {
    900
}

fn default_captcha_ttl_secs() -> u64 {
    600
}

fn default_captcha_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let limits = LimitsConfig::default();
        assert_eq!(limits.suggestions_per_window, 5);
        assert_eq!(limits.suggestion_window_secs, 3600);
        assert_eq!(limits.captcha_max_attempts, 3);
        assert!(limits.validate().is_ok());
    }

    #[test]
    fn zero_limits_rejected() {
        let limits = LimitsConfig {
            captcha_max_attempts: 0,
            ..Default::default()
        };
        assert_eq!(limits.validate(), Err(ValidationError::InvalidLimit("captcha")));
    }
}
