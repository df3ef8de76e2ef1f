//! Email configuration (Resend)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::foundation::is_plausible_email;

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key
    pub resend_api_key: SecretString,

    #[serde(default = "default_from_email")]
    pub from_email: String,

    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Where new contact and affiliation submissions are announced
    pub admin_notification_email: Option<String>,

    /// Resend API base URL; overridden in tests
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let key = self.resend_api_key.expose_secret();
        if key.is_empty() {
            return Err(ValidationError::MissingRequired("EMAIL__RESEND_API_KEY"));
        }
        if !key.starts_with("re_") {
            return Err(ValidationError::InvalidResendKey);
        }
        if !is_plausible_email(&self.from_email) {
            return Err(ValidationError::InvalidFromEmail);
        }
        if let Some(admin) = &self.admin_notification_email {
            if !is_plausible_email(admin) {
                return Err(ValidationError::InvalidFromEmail);
            }
        }
        Ok(())
    }
}

fn default_from_email() -> String {
    "no-reply@sindicato.example".to_string()
}

fn default_from_name() -> String {
    "Sindicato".to_string()
}

fn default_api_base() -> String {
    "https://api.resend.com".to_string()
}
