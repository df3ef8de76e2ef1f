//! Invoice aggregate with derived totals.
//!
//! Totals are never set directly. Every mutation of line items or tax rate,
//! and every deserialization, recomputes them, so a stored invoice always
//! satisfies `total == subtotal + taxAmount` with `subtotal == Σ lines`.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, InvoiceId, Money, StateMachine, Timestamp, UserId, ValidationError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Issued,
    Paid,
    Overdue,
    Cancelled,
}

impl StateMachine for InvoiceStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use InvoiceStatus::*;
        match self {
            Draft => vec![Issued, Cancelled],
            Issued => vec![Paid, Overdue, Cancelled],
            Overdue => vec![Paid, Cancelled],
            Paid | Cancelled => vec![],
        }
    }
}

pub const MAX_LINE_QUANTITY: u32 = 10_000;
/// One million in major units.
pub const MAX_UNIT_PRICE: Money = Money::from_cents(100_000_000);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub description: String,
    pub quantity: u32,
    pub unit_price: Money,
}

impl LineItem {
    pub fn amount(&self) -> Result<Money, ValidationError> {
        self.unit_price.checked_times(self.quantity)
    }

    fn validate(&self, index: usize) -> Result<(), ValidationError> {
        let field = format!("items[{}]", index);
        if self.description.trim().is_empty() {
            return Err(ValidationError::empty_field(format!("{}.description", field)));
        }
        if self.quantity == 0 || self.quantity > MAX_LINE_QUANTITY {
            return Err(ValidationError::out_of_range(
                format!("{}.quantity", field),
                1,
                i64::from(MAX_LINE_QUANTITY),
                i64::from(self.quantity),
            ));
        }
        if self.unit_price.is_negative() || self.unit_price > MAX_UNIT_PRICE {
            return Err(ValidationError::out_of_range(
                format!("{}.unitPrice", field),
                0,
                MAX_UNIT_PRICE.cents() / 100,
                self.unit_price.cents() / 100,
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub name: String,
    pub email: Option<String>,
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub tax_amount: Money,
    pub total: Money,
    pub balance_due: Money,
}

impl InvoiceTotals {
    fn compute(
        items: &[LineItem],
        tax_rate: f64,
        amount_paid: Money,
    ) -> Result<Self, ValidationError> {
        let subtotal = items
            .iter()
            .try_fold(Money::ZERO, |acc, item| acc.checked_add(item.amount()?))?;
        let tax_amount = subtotal.checked_percent(tax_rate)?;
        let total = subtotal.checked_add(tax_amount)?;
        Ok(Self {
            subtotal,
            tax_amount,
            total,
            balance_due: total.saturating_sub_floor_zero(amount_paid),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "InvoiceRecord")]
pub struct Invoice {
    id: InvoiceId,
    number: String,
    customer: Customer,
    items: Vec<LineItem>,
    tax_rate: f64,
    #[serde(flatten)]
    totals: InvoiceTotals,
    amount_paid: Money,
    status: InvoiceStatus,
    issue_date: Option<Timestamp>,
    due_date: Option<Timestamp>,
    notes: Option<String>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

/// Persisted shape; totals are ignored and recomputed on load.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceRecord {
    id: InvoiceId,
    number: String,
    customer: Customer,
    items: Vec<LineItem>,
    tax_rate: f64,
    #[serde(default)]
    amount_paid: Money,
    status: InvoiceStatus,
    issue_date: Option<Timestamp>,
    due_date: Option<Timestamp>,
    notes: Option<String>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl TryFrom<InvoiceRecord> for Invoice {
    type Error = ValidationError;

    fn try_from(r: InvoiceRecord) -> Result<Self, Self::Error> {
        let totals = InvoiceTotals::compute(&r.items, r.tax_rate, r.amount_paid)?;
        Ok(Invoice {
            id: r.id,
            number: r.number,
            customer: r.customer,
            items: r.items,
            tax_rate: r.tax_rate,
            totals,
            amount_paid: r.amount_paid,
            status: r.status,
            issue_date: r.issue_date,
            due_date: r.due_date,
            notes: r.notes,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

fn validate_tax_rate(rate: f64) -> Result<(), ValidationError> {
    if !rate.is_finite() || !(0.0..=100.0).contains(&rate) {
        return Err(ValidationError::invalid_format(
            "taxRate",
            "must be a percentage between 0 and 100",
        ));
    }
    Ok(())
}

fn validate_items(items: &[LineItem]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::empty_field("items"));
    }
    items
        .iter()
        .enumerate()
        .try_for_each(|(i, item)| item.validate(i))
}

impl Invoice {
    /// Creates a draft invoice. The number is assigned by the caller.
    pub fn draft(
        number: impl Into<String>,
        customer: Customer,
        items: Vec<LineItem>,
        tax_rate: f64,
        due_date: Option<Timestamp>,
        notes: Option<String>,
    ) -> Result<Self, ValidationError> {
        if customer.name.trim().is_empty() {
            return Err(ValidationError::empty_field("customer.name"));
        }
        validate_items(&items)?;
        validate_tax_rate(tax_rate)?;

        let now = Timestamp::now();
        let totals = InvoiceTotals::compute(&items, tax_rate, Money::ZERO)?;
        Ok(Self {
            id: InvoiceId::new(),
            number: number.into(),
            customer,
            items,
            tax_rate,
            totals,
            amount_paid: Money::ZERO,
            status: InvoiceStatus::Draft,
            issue_date: None,
            due_date,
            notes,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> InvoiceId {
        self.id
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    pub fn totals(&self) -> InvoiceTotals {
        self.totals
    }

    pub fn amount_paid(&self) -> Money {
        self.amount_paid
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn due_date(&self) -> Option<Timestamp> {
        self.due_date
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Replaces line items and tax rate. Only drafts are editable.
    pub fn replace_items(&mut self, items: Vec<LineItem>, tax_rate: f64) -> Result<(), DomainError> {
        if self.status != InvoiceStatus::Draft {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Only draft invoices can be edited",
            ));
        }
        validate_items(&items)?;
        validate_tax_rate(tax_rate)?;
        self.totals = InvoiceTotals::compute(&items, tax_rate, self.amount_paid)?;
        self.items = items;
        self.tax_rate = tax_rate;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn recompute_totals(&mut self) -> Result<(), ValidationError> {
        self.totals = InvoiceTotals::compute(&self.items, self.tax_rate, self.amount_paid)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn issue(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.transition(InvoiceStatus::Issued)?;
        self.issue_date = Some(now);
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.transition(InvoiceStatus::Cancelled)
    }

    pub fn mark_overdue(&mut self) -> Result<(), DomainError> {
        self.transition(InvoiceStatus::Overdue)
    }

    /// Applies a payment; the invoice becomes paid once nothing is left due.
    pub fn add_payment(&mut self, amount: Money) -> Result<(), DomainError> {
        if !amount.is_positive() {
            return Err(DomainError::validation("amount", "Payment must be positive"));
        }
        if !matches!(self.status, InvoiceStatus::Issued | InvoiceStatus::Overdue) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot record payments on a {:?} invoice", self.status),
            ));
        }
        if amount > self.totals.balance_due {
            return Err(DomainError::validation(
                "amount",
                format!("Payment exceeds balance due ({})", self.totals.balance_due),
            ));
        }
        self.amount_paid = self.amount_paid.checked_add(amount)?;
        self.recompute_totals()?;
        if self.totals.balance_due == Money::ZERO {
            self.transition(InvoiceStatus::Paid)?;
        }
        Ok(())
    }

    fn transition(&mut self, target: InvoiceStatus) -> Result<(), DomainError> {
        self.status = self
            .status
            .transition_to(target)
            .map_err(|e| DomainError::new(ErrorCode::InvalidStateTransition, e.to_string()))?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
