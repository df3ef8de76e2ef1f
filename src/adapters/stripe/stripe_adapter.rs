//! Stripe payment provider adapter.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::from_payment_config(&app_config.payment);
//! let adapter = StripePaymentAdapter::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::PaymentConfig;
use crate::domain::payment::{
    CheckoutRequest, CheckoutSession, StripeEvent, StripeWebhookVerifier, WebhookError,
    METADATA_DESCRIPTION, METADATA_USER_ID,
};
use crate::ports::{PaymentError, PaymentErrorCode, PaymentProvider};

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Webhook signing secret (whsec_...).
    webhook_secret: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,
}

impl StripeConfig {
    pub fn new(api_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
            api_base_url: "https://api.stripe.com".to_string(),
        }
    }

    pub fn from_payment_config(config: &PaymentConfig) -> Self {
        Self {
            api_key: config.stripe_api_key.clone(),
            webhook_secret: config.stripe_webhook_secret.clone(),
            api_base_url: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
    verifier: StripeWebhookVerifier,
}

#[derive(Debug, Deserialize)]
struct StripeCheckoutResponse {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    message: Option<String>,
    code: Option<String>,
}

impl StripePaymentAdapter {
    pub fn new(config: StripeConfig) -> Self {
        let verifier = StripeWebhookVerifier::new(config.webhook_secret.clone());
        Self {
            config,
            http_client: reqwest::Client::new(),
            verifier,
        }
    }

    /// Form parameters for a one-off card payment.
    fn checkout_params(request: &CheckoutRequest) -> Vec<(String, String)> {
        let params = vec![
            ("mode", "payment".to_string()),
            ("payment_method_types[0]", "card".to_string()),
            ("customer_email", request.customer_email.as_str().to_string()),
            ("client_reference_id", request.user_id.to_string()),
            ("success_url", request.success_url.clone()),
            ("cancel_url", request.cancel_url.clone()),
            ("line_items[0][quantity]", "1".to_string()),
            (
                "line_items[0][price_data][currency]",
                request.currency.to_lowercase(),
            ),
            (
                "line_items[0][price_data][unit_amount]",
                request.amount.cents().to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]",
                request.description.clone(),
            ),
        ];
        let metadata = [
            (METADATA_USER_ID, request.user_id.to_string()),
            (METADATA_DESCRIPTION, request.description.clone()),
        ];
        params
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .chain(
                metadata
                    .into_iter()
                    .map(|(k, v)| (format!("metadata[{}]", k), v)),
            )
            .collect()
    }

    fn error_from_response(status: reqwest::StatusCode, body: &str) -> PaymentError {
        let parsed = serde_json::from_str::<StripeErrorEnvelope>(body).ok();
        let message = parsed
            .as_ref()
            .and_then(|e| e.error.message.clone())
            .unwrap_or_else(|| format!("Stripe API error ({})", status.as_u16()));

        let error = match status.as_u16() {
            401 => PaymentError::authentication(message),
            429 => PaymentError::new(PaymentErrorCode::RateLimitExceeded, message),
            400 | 402 | 404 => PaymentError::invalid_request(message),
            _ => PaymentError::provider(message),
        };
        match parsed.and_then(|e| e.error.code) {
            Some(code) => error.with_provider_code(code),
            None => error,
        }
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);
        let params = Self::checkout_params(request);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                user_id = %request.user_id,
                "Stripe create_checkout_session failed"
            );
            return Err(Self::error_from_response(status, &error_text));
        }

        let session: StripeCheckoutResponse = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;
        let url = session
            .url
            .ok_or_else(|| PaymentError::provider("Stripe returned a session without a URL"))?;

        tracing::info!(session_id = %session.id, user_id = %request.user_id, "Checkout session created");
        Ok(CheckoutSession {
            session_id: session.id,
            url,
        })
    }

    fn verify_webhook(&self, payload: &[u8], signature: &str) -> Result<StripeEvent, WebhookError> {
        self.verifier.verify_and_parse(payload, signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Email, Money, UserId};
    use crate::domain::payment::sign_payload;

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            user_id: UserId::new(),
            customer_email: Email::parse("ana@example.com").unwrap(),
            amount: Money::from_cents(3600),
            currency: "EUR".into(),
            description: "Cuota de afiliación".into(),
            success_url: "https://sindicato.example/pago/exito".into(),
            cancel_url: "https://sindicato.example/pago/cancelado".into(),
        }
    }

    #[test]
    fn checkout_params_carry_amount_and_metadata() {
        let req = request();
        let params = StripePaymentAdapter::checkout_params(&req);
        let get = |k: &str| {
            params
                .iter()
                .find(|(key, _)| *key == k)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("mode"), Some("payment"));
        assert_eq!(get("line_items[0][price_data][unit_amount]"), Some("3600"));
        assert_eq!(get("line_items[0][price_data][currency]"), Some("eur"));
        assert_eq!(get("customer_email"), Some("ana@example.com"));
        assert_eq!(get("metadata[user_id]"), Some(req.user_id.to_string().as_str()));
        assert_eq!(get("metadata[description]"), Some("Cuota de afiliación"));
    }

    #[test]
    fn error_mapping_uses_status_and_provider_code() {
        let body = r#"{"error":{"message":"Invalid API Key provided","code":"api_key_invalid"}}"#;
        let err = StripePaymentAdapter::error_from_response(reqwest::StatusCode::UNAUTHORIZED, body);
        assert_eq!(err.code, PaymentErrorCode::AuthenticationError);
        assert_eq!(err.provider_code.as_deref(), Some("api_key_invalid"));

        let err = StripePaymentAdapter::error_from_response(
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            "not json",
        );
        assert_eq!(err.code, PaymentErrorCode::RateLimitExceeded);
        assert!(err.retryable);
    }

    #[test]
    fn verify_webhook_uses_configured_secret() {
        let adapter = StripePaymentAdapter::new(StripeConfig::new("sk_test_x", "whsec_abc"));
        let payload = br#"{"id":"evt_1","type":"checkout.session.expired","created":1,"data":{"object":{}}}"#;
        let now = chrono::Utc::now().timestamp();

        let header = sign_payload("whsec_abc", now, payload);
        assert!(adapter.verify_webhook(payload, &header).is_ok());

        let forged = sign_payload("whsec_other", now, payload);
        assert_eq!(
            adapter.verify_webhook(payload, &forged).unwrap_err(),
            WebhookError::InvalidSignature
        );
    }
}
