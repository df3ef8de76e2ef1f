//! HTTP DTOs for accounting.
//!
//! Amounts travel as decimal numbers in major units and deserialize straight
//! into `Money`. Business rules (positive amounts, valid line items, status
//! transitions) stay in the domain; these types only bound sizes.

use serde::Deserialize;

use crate::domain::accounting::{
    Customer, LineItem, TransactionKind, MAX_LINE_QUANTITY, MAX_UNIT_PRICE,
};
use crate::domain::foundation::{Money, Timestamp, UserId};

use super::super::validation::{FieldError, Validate, Validator};

pub const DEFAULT_TAX_RATE: f64 = 21.0;
pub const MAX_LINE_ITEMS: usize = 100;
/// Ceiling for a single transaction, payment or fee: one million.
pub const MAX_AMOUNT: Money = Money::from_cents(100_000_000);

fn amount_bound(v: &mut Validator, field: &'static str, amount: Money) {
    if amount > MAX_AMOUNT {
        v.push(field, format!("No puede superar {}", MAX_AMOUNT));
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Transactions
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionListQuery {
    pub kind: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub kind: TransactionKind,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub amount: Money,
    /// Defaults to now.
    pub date: Option<Timestamp>,
    pub user_id: Option<UserId>,
}

impl Validate for CreateTransactionRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.field("category", Some(self.category.as_str())).max_len(50);
        v.field("description", Some(self.description.as_str())).max_len(500);
        amount_bound(&mut v, "amount", self.amount);
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancelRequest {
    pub reason: Option<String>,
}

impl Validate for CancelRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.field("reason", self.reason.as_deref()).max_len(500);
        v.finish()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Invoices
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    pub customer: Customer,
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Percent. Defaults to the general VAT rate.
    pub tax_rate: Option<f64>,
    pub due_date: Option<Timestamp>,
    pub notes: Option<String>,
}

impl CreateInvoiceRequest {
    pub fn tax_rate(&self) -> f64 {
        self.tax_rate.unwrap_or(DEFAULT_TAX_RATE)
    }
}

impl Validate for CreateInvoiceRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.field("customer.name", Some(self.customer.name.as_str()))
            .required()
            .max_len(200);
        v.field("customer.email", self.customer.email.as_deref()).email();
        v.field("notes", self.notes.as_deref()).max_len(2000);
        if self.items.is_empty() {
            v.push("items", "La factura necesita al menos una línea");
        }
        v.range("items", self.items.len(), 0, MAX_LINE_ITEMS);
        for item in &self.items {
            v.range("items.quantity", item.quantity, 1, MAX_LINE_QUANTITY);
            if item.unit_price.is_negative() || item.unit_price > MAX_UNIT_PRICE {
                v.push(
                    "items.unitPrice",
                    format!("Debe estar entre 0.00 y {}", MAX_UNIT_PRICE),
                );
            }
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRequest {
    pub amount: Money,
}

impl Validate for PaymentRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        amount_bound(&mut v, "amount", self.amount);
        v.finish()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Membership fees
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeListQuery {
    pub user_id: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateFeesRequest {
    pub year: i32,
    pub month: u32,
    /// Defaults to the configured membership fee.
    pub amount: Option<Money>,
}

impl Validate for GenerateFeesRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.range("year", self.year, 2000, 2100);
        v.range("month", self.month, 1, 12);
        if let Some(amount) = self.amount {
            amount_bound(&mut v, "amount", amount);
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaiveRequest {
    #[serde(default)]
    pub reason: String,
}

impl Validate for WaiveRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.field("reason", Some(self.reason.as_str()))
            .required()
            .max_len(500);
        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn invoice_request_defaults_tax_rate() {
        let req: CreateInvoiceRequest = serde_json::from_value(json!({
            "customer": { "name": "Ayuntamiento" },
            "items": [{ "description": "Cuota", "quantity": 2, "unitPrice": 10.0 }]
        }))
        .unwrap();
        assert_eq!(req.tax_rate(), DEFAULT_TAX_RATE);
        assert!(req.validate().is_ok());
        assert_eq!(req.items[0].unit_price, Money::from_cents(1000));
    }

    #[test]
    fn invoice_without_items_is_rejected() {
        let req: CreateInvoiceRequest = serde_json::from_value(json!({
            "customer": { "name": "Ayuntamiento" }
        }))
        .unwrap();
        assert_eq!(req.validate().unwrap_err()[0].field, "items");
    }

    #[test]
    fn fee_period_is_bounded() {
        let req = GenerateFeesRequest {
            year: 2024,
            month: 13,
            amount: None,
        };
        assert_eq!(req.validate().unwrap_err()[0].field, "month");
    }

    #[test]
    fn invoice_lines_are_bounded() {
        let req: CreateInvoiceRequest = serde_json::from_value(json!({
            "customer": { "name": "Ayuntamiento" },
            "items": [{ "description": "Cuota", "quantity": 20000, "unitPrice": 2000000.0 }]
        }))
        .unwrap();
        let fields: Vec<String> = req.validate().unwrap_err().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["items.quantity", "items.unitPrice"]);
    }

    #[test]
    fn amounts_above_ceiling_are_rejected() {
        let payment: PaymentRequest =
            serde_json::from_value(json!({ "amount": 1000000.01 })).unwrap();
        assert_eq!(payment.validate().unwrap_err()[0].field, "amount");

        let fees = GenerateFeesRequest {
            year: 2024,
            month: 3,
            amount: Some(Money::from_cents(100_000_001)),
        };
        assert_eq!(fees.validate().unwrap_err()[0].field, "amount");

        let ok: PaymentRequest = serde_json::from_value(json!({ "amount": 1000000.0 })).unwrap();
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn waiving_needs_a_reason() {
        let req: WaiveRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(req.validate().unwrap_err()[0].field, "reason");
    }
}
