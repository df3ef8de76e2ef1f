//! Payment configuration (Stripe)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key (`sk_test_…` or `sk_live_…`)
    pub stripe_api_key: SecretString,

    /// Stripe webhook signing secret (`whsec_…`)
    pub stripe_webhook_secret: SecretString,

    /// ISO currency code, lowercase
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Annual membership fee in cents
    #[serde(default = "default_membership_fee_cents")]
    pub membership_fee_cents: i64,

    /// Path on the public site for successful checkouts
    #[serde(default = "default_success_path")]
    pub success_path: String,

    #[serde(default = "default_cancel_path")]
    pub cancel_path: String,

    /// Stripe API base URL; overridden in tests
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl PaymentConfig {
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_test_")
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let api_key = self.stripe_api_key.expose_secret();
        let webhook_secret = self.stripe_webhook_secret.expose_secret();
        if api_key.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__STRIPE_API_KEY"));
        }
        if webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__STRIPE_WEBHOOK_SECRET"));
        }
        if !api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }
        if self.membership_fee_cents <= 0 {
            return Err(ValidationError::InvalidMembershipFee);
        }
        Ok(())
    }
}

fn default_currency() -> String {
    "eur".to_string()
}

fn default_membership_fee_cents() -> i64 {
    3600
}

fn default_success_path() -> String {
    "/pago/exito".to_string()
}

fn default_cancel_path() -> String {
    "/pago/cancelado".to_string()
}

fn default_api_base() -> String {
    "https://api.stripe.com".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str, webhook_secret: &str) -> PaymentConfig {
        PaymentConfig {
            stripe_api_key: SecretString::new(api_key.to_string()),
            stripe_webhook_secret: SecretString::new(webhook_secret.to_string()),
            currency: default_currency(),
            membership_fee_cents: default_membership_fee_cents(),
            success_path: default_success_path(),
            cancel_path: default_cancel_path(),
            api_base: default_api_base(),
        }
    }

    #[test]
    fn test_is_test_mode() {
        assert!(config("sk_test_xxx", "whsec_xxx").is_test_mode());
        assert!(!config("sk_live_xxx", "whsec_xxx").is_test_mode());
    }

    #[test]
    fn test_validation_missing_values() {
        assert_eq!(
            config("", "whsec_xxx").validate(),
            Err(ValidationError::MissingRequired("PAYMENT__STRIPE_API_KEY"))
        );
        assert_eq!(
            config("sk_test_xxx", "").validate(),
            Err(ValidationError::MissingRequired("PAYMENT__STRIPE_WEBHOOK_SECRET"))
        );
    }

    #[test]
    fn test_validation_key_prefixes() {
        assert_eq!(
            config("pk_test_xxx", "whsec_xxx").validate(),
            Err(ValidationError::InvalidStripeKey)
        );
        assert_eq!(
            config("sk_test_xxx", "secret_xxx").validate(),
            Err(ValidationError::InvalidStripeWebhookSecret)
        );
        assert!(config("sk_test_abcd1234", "whsec_xyz789").validate().is_ok());
    }

    #[test]
    fn test_validation_fee_must_be_positive() {
        let mut c = config("sk_test_xxx", "whsec_xxx");
        c.membership_fee_cents = 0;
        assert_eq!(c.validate(), Err(ValidationError::InvalidMembershipFee));
    }
}
