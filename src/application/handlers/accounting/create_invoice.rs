//! CreateInvoiceHandler - drafts an invoice with the next yearly number.

use std::sync::Arc;

use crate::application::ApplicationError;
use crate::domain::accounting::{Customer, Invoice, LineItem};
use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::InvoiceRepository;

#[derive(Debug, Clone)]
pub struct CreateInvoiceCommand {
    pub customer: Customer,
    pub items: Vec<LineItem>,
    /// Percent, e.g. `21.0`.
    pub tax_rate: f64,
    pub due_date: Option<Timestamp>,
    pub notes: Option<String>,
}

pub struct CreateInvoiceHandler {
    invoices: Arc<dyn InvoiceRepository>,
}

impl CreateInvoiceHandler {
    pub fn new(invoices: Arc<dyn InvoiceRepository>) -> Self {
        Self { invoices }
    }

    pub async fn handle(&self, cmd: CreateInvoiceCommand) -> Result<Invoice, ApplicationError> {
        let year = Timestamp::now().year();
        let sequence = self.invoices.count_for_year(year).await? + 1;
        let number = invoice_number(year, sequence);

        let invoice = Invoice::draft(
            number,
            cmd.customer,
            cmd.items,
            cmd.tax_rate,
            cmd.due_date,
            cmd.notes,
        )
        .map_err(DomainError::from)?;
        self.invoices.create(&invoice).await?;
        tracing::info!(invoice_id = %invoice.id(), number = invoice.number(), "Invoice drafted");
        Ok(invoice)
    }
}

fn invoice_number(year: i32, sequence: u64) -> String {
    format!("FAC-{}-{:04}", year, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Fixture;
    use crate::domain::foundation::{ErrorCode, Money};

    fn command() -> CreateInvoiceCommand {
        CreateInvoiceCommand {
            customer: Customer {
                name: "Cooperativa La Vega".into(),
                email: None,
                user_id: None,
            },
            items: vec![LineItem {
                description: "Alquiler de sala".into(),
                quantity: 2,
                unit_price: Money::from_cents(1000),
            }],
            tax_rate: 21.0,
            due_date: None,
            notes: None,
        }
    }

    #[test]
    fn numbers_are_zero_padded_per_year() {
        assert_eq!(invoice_number(2024, 7), "FAC-2024-0007");
    }

    #[tokio::test]
    async fn drafts_with_consecutive_numbers_and_totals() {
        let fx = Fixture::new();
        let handler = CreateInvoiceHandler::new(fx.invoices.clone());
        let year = Timestamp::now().year();

        let first = handler.handle(command()).await.unwrap();
        let second = handler.handle(command()).await.unwrap();

        assert_eq!(first.number(), format!("FAC-{}-0001", year));
        assert_eq!(second.number(), format!("FAC-{}-0002", year));
        let totals = first.totals();
        assert_eq!(totals.subtotal, Money::from_cents(2000));
        assert_eq!(totals.tax_amount, Money::from_cents(420));
        assert_eq!(totals.total, Money::from_cents(2420));
    }

    #[tokio::test]
    async fn rejects_empty_customer() {
        let fx = Fixture::new();
        let mut cmd = command();
        cmd.customer.name = " ".into();

        let err = CreateInvoiceHandler::new(fx.invoices.clone())
            .handle(cmd)
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::ValidationFailed));
    }
}
