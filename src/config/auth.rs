//! Authentication configuration: session token signing and the bootstrap admin.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::foundation::is_plausible_email;

pub const MIN_JWT_SECRET_LEN: usize = 32;
pub const MIN_ADMIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing key for session tokens
    pub jwt_secret: SecretString,

    /// Session token lifetime in hours
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: u64,

    /// Admin account ensured at start-up
    pub admin_email: String,

    pub admin_password: SecretString,

    #[serde(default = "default_admin_name")]
    pub admin_name: String,
}

impl AuthConfig {
    pub fn token_ttl_secs(&self) -> u64 {
        self.token_ttl_hours * 3600
    }

    /// Absence or weakness of any secret is fatal at start-up.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ValidationError::JwtSecretTooShort(MIN_JWT_SECRET_LEN));
        }
        if self.token_ttl_hours == 0 || self.token_ttl_hours > 720 {
            return Err(ValidationError::InvalidTokenTtl);
        }
        if self.admin_email.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__ADMIN_EMAIL"));
        }
        if !is_plausible_email(self.admin_email.trim()) {
            return Err(ValidationError::InvalidAdminEmail);
        }
        let password = self.admin_password.expose_secret();
        if password.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__ADMIN_PASSWORD"));
        }
        if password.chars().count() < MIN_ADMIN_PASSWORD_LEN {
            return Err(ValidationError::AdminPasswordTooShort(MIN_ADMIN_PASSWORD_LEN));
        }
        Ok(())
    }
}

fn default_token_ttl_hours() -> u64 {
    24
}

fn default_admin_name() -> String {
    "Administrador".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AuthConfig {
        AuthConfig {
            jwt_secret: SecretString::new("0123456789abcdef0123456789abcdef".to_string()),
            token_ttl_hours: 24,
            admin_email: "admin@sindicato.example".to_string(),
            admin_password: SecretString::new("cambiame123".to_string()),
            admin_name: default_admin_name(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(valid().validate().is_ok());
        assert_eq!(valid().token_ttl_secs(), 86_400);
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let config = AuthConfig {
            jwt_secret: SecretString::new("short".to_string()),
            ..valid()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::JwtSecretTooShort(MIN_JWT_SECRET_LEN))
        );
    }

    #[test]
    fn test_missing_admin_password_rejected() {
        let config = AuthConfig {
            admin_password: SecretString::new(String::new()),
            ..valid()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("AUTH__ADMIN_PASSWORD"))
        );
    }

    #[test]
    fn test_invalid_admin_email_rejected() {
        let config = AuthConfig {
            admin_email: "admin".to_string(),
            ..valid()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidAdminEmail));
    }

    #[test]
    fn test_ttl_bounds() {
        let config = AuthConfig {
            token_ttl_hours: 0,
            ..valid()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTokenTtl));
    }

    #[test]
    fn test_debug_does_not_leak_secrets() {
        let rendered = format!("{:?}", valid());
        assert!(!rendered.contains("0123456789abcdef"));
        assert!(!rendered.contains("cambiame123"));
    }
}
