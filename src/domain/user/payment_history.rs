//! Payment-history entries appended by checkout reconciliation.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DocumentId, Money, PaymentId, Timestamp};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEntry {
    pub id: PaymentId,
    pub amount: Money,
    pub currency: String,
    pub description: String,
    /// Provider checkout session id; used to ignore redelivered webhooks.
    pub session_id: Option<String>,
    pub paid_at: Timestamp,
    pub receipt_document_id: Option<DocumentId>,
}

impl PaymentEntry {
    pub fn new(
        amount: Money,
        currency: impl Into<String>,
        description: impl Into<String>,
        session_id: Option<String>,
        paid_at: Timestamp,
    ) -> Self {
        Self {
            id: PaymentId::new(),
            amount,
            currency: currency.into().to_lowercase(),
            description: description.into(),
            session_id,
            paid_at,
            receipt_document_id: None,
        }
    }
}
