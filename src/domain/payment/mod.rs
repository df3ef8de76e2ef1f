//! Payment module - checkout sessions and webhook reconciliation.
//!
//! Webhook bodies are authenticated with the provider's HMAC signature
//! before anything is parsed. Verified `checkout.session.completed`
//! events become [`CompletedCheckout`] values that the application layer
//! reconciles against user accounts.

mod checkout;
mod errors;
mod stripe_event;
mod webhook_verifier;

pub use checkout::{
    CheckoutRequest, CheckoutSession, CompletedCheckout, ReconciliationOutcome,
    UnmatchedPayment, DEFAULT_PAYMENT_DESCRIPTION, METADATA_DESCRIPTION, METADATA_USER_ID,
};
pub use errors::WebhookError;
pub use stripe_event::{CheckoutSessionObject, CustomerDetails, StripeEvent, StripeEventType};
pub use webhook_verifier::{sign_payload, SignatureHeader, StripeWebhookVerifier};
