//! HTTP DTOs for payments.

use serde::{Deserialize, Serialize};

use crate::domain::payment::ReconciliationOutcome;

use super::super::validation::{FieldError, Validate, Validator};

pub const MAX_CHECKOUT_AMOUNT: f64 = 10_000.0;

/// Both fields are optional; the membership fee is charged by default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequestBody {
    pub amount: Option<f64>,
    pub description: Option<String>,
}

impl Validate for CheckoutRequestBody {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        if let Some(amount) = self.amount {
            v.range("amount", amount, 0.5, MAX_CHECKOUT_AMOUNT);
        }
        v.field("description", self.description.as_deref()).max_len(200);
        v.finish()
    }
}

/// Acknowledgement returned to the provider once the event is authenticated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAck {
    pub received: bool,
    pub event_id: String,
    pub outcome: &'static str,
}

impl WebhookAck {
    pub fn new(event_id: String, outcome: &ReconciliationOutcome) -> Self {
        Self {
            received: true,
            event_id,
            outcome: outcome_label(outcome),
        }
    }
}

pub fn outcome_label(outcome: &ReconciliationOutcome) -> &'static str {
    match outcome {
        ReconciliationOutcome::Reconciled { .. } => "reconciled",
        ReconciliationOutcome::AlreadyRecorded { .. } => "already_recorded",
        ReconciliationOutcome::Unmatched { .. } => "unmatched",
        ReconciliationOutcome::Ignored { .. } => "ignored",
        ReconciliationOutcome::Failed { .. } => "failed",
    }
}
