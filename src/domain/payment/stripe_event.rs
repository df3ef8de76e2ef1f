//! Stripe webhook event types.
//!
//! Only the fields the portal reconciles are captured; the rest of
//! Stripe's schema is ignored on deserialization.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stripe webhook event (simplified).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    pub created: i64,

    pub data: StripeEventData,

    #[serde(default)]
    pub livemode: bool,

    #[serde(default)]
    pub api_version: Option<String>,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: serde_json::Value,
}

impl StripeEvent {
    pub fn is_live(&self) -> bool {
        self.livemode
    }

    /// Attempts to deserialize the data object as the specified type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.object.clone())
    }

    pub fn parsed_type(&self) -> StripeEventType {
        StripeEventType::parse(&self.event_type)
    }
}

/// Event types the portal distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripeEventType {
    /// Checkout session completed successfully.
    CheckoutSessionCompleted,
    CheckoutSessionExpired,
    PaymentIntentSucceeded,
    PaymentIntentFailed,
    /// Unknown or unhandled event type.
    Unknown,
}

impl StripeEventType {
    pub fn parse(s: &str) -> Self {
        match s {
            "checkout.session.completed" => Self::CheckoutSessionCompleted,
            "checkout.session.expired" => Self::CheckoutSessionExpired,
            "payment_intent.succeeded" => Self::PaymentIntentSucceeded,
            "payment_intent.payment_failed" => Self::PaymentIntentFailed,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckoutSessionCompleted => "checkout.session.completed",
            Self::CheckoutSessionExpired => "checkout.session.expired",
            Self::PaymentIntentSucceeded => "payment_intent.succeeded",
            Self::PaymentIntentFailed => "payment_intent.payment_failed",
            Self::Unknown => "unknown",
        }
    }
}

/// The `data.object` of a `checkout.session.*` event.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CheckoutSessionObject {
    pub id: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
    /// Total in the currency's minor unit.
    #[serde(default)]
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl CheckoutSessionObject {
    /// Email the customer paid with. The explicit `customer_email` wins over
    /// the details Stripe collected on the hosted page.
    pub fn payer_email(&self) -> Option<&str> {
        let present = |e: &&str| !e.trim().is_empty();
        self.customer_email.as_deref().filter(present).or_else(|| {
            self.customer_details
                .as_ref()?
                .email
                .as_deref()
                .filter(present)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ══════════════════════════════════════════════════════════════
    // Deserialization Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn deserialize_minimal_event() {
        let json = r#"{
            "id": "evt_1234567890",
            "type": "checkout.session.completed",
            "created": 1704067200,
            "data": { "object": {} },
            "livemode": false,
            "api_version": "2023-10-16"
        }"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.id, "evt_1234567890");
        assert_eq!(event.parsed_type(), StripeEventType::CheckoutSessionCompleted);
        assert!(!event.is_live());
    }

    #[test]
    fn checkout_object_reads_metadata_and_amount() {
        let event: StripeEvent = serde_json::from_value(json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "created": 1704067200,
            "data": { "object": {
                "id": "cs_test_abc",
                "customer_email": "ana@example.com",
                "amount_total": 1500,
                "currency": "eur",
                "payment_status": "paid",
                "metadata": { "description": "Cuota anual" }
            }}
        }))
        .unwrap();

        let session: CheckoutSessionObject = event.deserialize_object().unwrap();
        assert_eq!(session.id, "cs_test_abc");
        assert_eq!(session.amount_total, Some(1500));
        assert_eq!(session.metadata.get("description").unwrap(), "Cuota anual");
    }

    #[test]
    fn payer_email_falls_back_to_customer_details() {
        let session = CheckoutSessionObject {
            id: "cs_1".into(),
            customer_details: Some(CustomerDetails {
                email: Some("luis@example.com".into()),
                name: None,
            }),
            ..Default::default()
        };
        assert_eq!(session.payer_email(), Some("luis@example.com"));

        let blank = CheckoutSessionObject {
            id: "cs_2".into(),
            customer_email: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(blank.payer_email(), None);
    }

    #[test]
    fn unknown_types_are_tolerated() {
        assert_eq!(StripeEventType::parse("invoice.paid"), StripeEventType::Unknown);
        for t in [
            StripeEventType::CheckoutSessionCompleted,
            StripeEventType::CheckoutSessionExpired,
            StripeEventType::PaymentIntentFailed,
        ] {
            assert_eq!(StripeEventType::parse(t.as_str()), t);
        }
    }
}
