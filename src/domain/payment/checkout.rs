//! Checkout sessions and the reconciliation of completed payments.

use serde::{Deserialize, Serialize};

use super::errors::WebhookError;
use super::stripe_event::CheckoutSessionObject;
use crate::domain::foundation::{Email, Money, PaymentId, SubmissionId, Timestamp, UserId};

/// Metadata key carrying the portal user id on a checkout session.
pub const METADATA_USER_ID: &str = "user_id";
/// Metadata key carrying the human-readable purpose of the payment.
pub const METADATA_DESCRIPTION: &str = "description";

pub const DEFAULT_PAYMENT_DESCRIPTION: &str = "Cuota de afiliación";

/// What the portal asks the provider to charge.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub user_id: UserId,
    pub customer_email: Email,
    pub amount: Money,
    pub currency: String,
    pub description: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// A provider-hosted checkout the member is redirected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub session_id: String,
    pub url: String,
}

/// A paid checkout extracted from a verified `checkout.session.completed` event.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedCheckout {
    pub session_id: String,
    pub payer_email: Option<Email>,
    pub amount: Money,
    pub currency: String,
    pub description: String,
    pub user_id: Option<UserId>,
}

impl CompletedCheckout {
    pub fn from_session(session: &CheckoutSessionObject) -> Result<Self, WebhookError> {
        if session.id.is_empty() {
            return Err(WebhookError::MissingField("id"));
        }
        let amount = session
            .amount_total
            .map(Money::from_cents)
            .ok_or(WebhookError::MissingField("amount_total"))?;
        let payer_email = session.payer_email().and_then(|e| Email::parse(e).ok());
        let user_id = session
            .metadata
            .get(METADATA_USER_ID)
            .and_then(|raw| raw.parse().ok());
        let description = session
            .metadata
            .get(METADATA_DESCRIPTION)
            .filter(|d| !d.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_PAYMENT_DESCRIPTION.to_string());

        Ok(Self {
            session_id: session.id.clone(),
            payer_email,
            amount,
            currency: session
                .currency
                .clone()
                .unwrap_or_else(|| "eur".to_string())
                .to_lowercase(),
            description,
            user_id,
        })
    }
}

/// A completed payment that could not be tied to an account.
///
/// Kept for manual reconciliation by an admin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmatchedPayment {
    pub id: SubmissionId,
    pub session_id: String,
    pub email: Option<String>,
    pub amount: Money,
    pub currency: String,
    pub description: String,
    pub received_at: Timestamp,
    pub resolved: bool,
}

impl UnmatchedPayment {
    pub fn from_checkout(checkout: &CompletedCheckout) -> Self {
        Self {
            id: SubmissionId::new(),
            session_id: checkout.session_id.clone(),
            email: checkout.payer_email.as_ref().map(|e| e.as_str().to_string()),
            amount: checkout.amount,
            currency: checkout.currency.clone(),
            description: checkout.description.clone(),
            received_at: Timestamp::now(),
            resolved: false,
        }
    }
}

/// Result of processing one verified webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationOutcome {
    /// Payment appended to the user and a receipt issued.
    Reconciled {
        user_id: UserId,
        payment_id: PaymentId,
        receipt_issued: bool,
    },
    /// Session already recorded for this user; nothing changed.
    AlreadyRecorded { user_id: UserId },
    /// No account matches; queued for manual reconciliation.
    Unmatched { session_id: String },
    /// Event type the portal does not act on.
    Ignored { event_type: String },
    /// Reconciliation failed after verification; logged only.
    Failed { reason: String },
}
