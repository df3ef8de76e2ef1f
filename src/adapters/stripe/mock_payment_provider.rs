//! Mock payment provider for testing.
//!
//! Checkout creation is simulated and recorded; webhook verification uses
//! the real signature verifier so tests exercise the same security path as
//! production.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use secrecy::SecretString;

use crate::domain::payment::{
    CheckoutRequest, CheckoutSession, StripeEvent, StripeWebhookVerifier, WebhookError,
};
use crate::ports::{PaymentError, PaymentProvider};

#[derive(Clone)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
    verifier: Arc<StripeWebhookVerifier>,
}

#[derive(Default)]
struct MockState {
    next_checkout: Option<CheckoutSession>,
    next_error: Option<PaymentError>,
    checkout_requests: Vec<CheckoutRequest>,
}

impl MockPaymentProvider {
    pub fn new(webhook_secret: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockState::default())),
            verifier: Arc::new(StripeWebhookVerifier::new(SecretString::new(
                webhook_secret.into(),
            ))),
        }
    }

    /// Set the checkout session to return.
    pub fn set_checkout_session(&self, session: CheckoutSession) {
        self.state().next_checkout = Some(session);
    }

    /// Error to return on the next checkout call.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Every checkout request received, in order.
    pub fn checkout_requests(&self) -> Vec<CheckoutRequest> {
        self.state().checkout_requests.clone()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        // Recover from poisoning left by a panicking test.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let mut state = self.state();
        state.checkout_requests.push(request.clone());
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        Ok(state.next_checkout.take().unwrap_or_else(|| {
            let id = format!("cs_test_{}", uuid::Uuid::new_v4().simple());
            CheckoutSession {
                url: format!("https://checkout.stripe.com/c/pay/{}", id),
                session_id: id,
            }
        }))
    }

    fn verify_webhook(&self, payload: &[u8], signature: &str) -> Result<StripeEvent, WebhookError> {
        self.verifier.verify_and_parse(payload, signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Email, Money, UserId};

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            user_id: UserId::new(),
            customer_email: Email::parse("ana@example.com").unwrap(),
            amount: Money::from_cents(3600),
            currency: "eur".into(),
            description: "Cuota".into(),
            success_url: "https://x/ok".into(),
            cancel_url: "https://x/ko".into(),
        }
    }

    #[tokio::test]
    async fn records_requests_and_generates_sessions() {
        let mock = MockPaymentProvider::new("whsec_test");
        let session = mock.create_checkout_session(&request()).await.unwrap();

        assert!(session.session_id.starts_with("cs_test_"));
        assert!(session.url.ends_with(&session.session_id));
        assert_eq!(mock.checkout_requests().len(), 1);
    }

    #[tokio::test]
    async fn configured_error_is_returned_once() {
        let mock = MockPaymentProvider::new("whsec_test");
        mock.set_error(PaymentError::network("timeout"));

        assert!(mock.create_checkout_session(&request()).await.is_err());
        assert!(mock.create_checkout_session(&request()).await.is_ok());
    }

    #[tokio::test]
    async fn configured_session_is_returned() {
        let mock = MockPaymentProvider::new("whsec_test");
        mock.set_checkout_session(CheckoutSession {
            session_id: "cs_custom".into(),
            url: "https://custom.checkout.url".into(),
        });

        let session = mock.create_checkout_session(&request()).await.unwrap();
        assert_eq!(session.url, "https://custom.checkout.url");
    }
}
