//! AccountingSummaryHandler - headline figures for the accounting dashboard.

use std::sync::Arc;

use serde::Serialize;

use crate::application::ApplicationError;
use crate::domain::accounting::{FeeStatus, InvoiceStatus, TransactionKind, TransactionStatus};
use crate::domain::foundation::Money;
use crate::ports::{
    FeeFilter, InvoiceRepository, MembershipFeeRepository, TransactionFilter,
    TransactionRepository,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountingSummary {
    /// Approved income only.
    pub income: Money,
    /// Approved expenses only.
    pub expense: Money,
    pub balance: Money,
    /// Balance due across issued and overdue invoices.
    pub outstanding_invoices: Money,
    pub pending_fees: u64,
    pub pending_fees_amount: Money,
}

pub struct AccountingSummaryHandler {
    transactions: Arc<dyn TransactionRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    fees: Arc<dyn MembershipFeeRepository>,
}

impl AccountingSummaryHandler {
    pub fn new(
        transactions: Arc<dyn TransactionRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        fees: Arc<dyn MembershipFeeRepository>,
    ) -> Self {
        Self {
            transactions,
            invoices,
            fees,
        }
    }

    pub async fn handle(&self) -> Result<AccountingSummary, ApplicationError> {
        let approved = self
            .transactions
            .list(&TransactionFilter {
                kind: None,
                status: Some(TransactionStatus::Approved),
            })
            .await?;
        let total_of = |kind: TransactionKind| -> Money {
            approved
                .iter()
                .filter(|t| t.kind == kind)
                .map(|t| t.amount)
                .sum()
        };
        let income = total_of(TransactionKind::Income);
        let expense = total_of(TransactionKind::Expense);

        let mut outstanding_invoices = Money::ZERO;
        for status in [InvoiceStatus::Issued, InvoiceStatus::Overdue] {
            for invoice in self.invoices.list(Some(status)).await? {
                outstanding_invoices += invoice.totals().balance_due;
            }
        }

        let mut pending_fees = 0;
        let mut pending_fees_amount = Money::ZERO;
        for status in [FeeStatus::Pending, FeeStatus::Overdue] {
            let fees = self
                .fees
                .list(&FeeFilter {
                    status: Some(status),
                    ..Default::default()
                })
                .await?;
            pending_fees += fees.len() as u64;
            pending_fees_amount += fees.iter().map(|f| f.balance_due()).sum::<Money>();
        }

        Ok(AccountingSummary {
            income,
            expense,
            balance: income - expense,
            outstanding_invoices,
            pending_fees,
            pending_fees_amount,
        })
    }
}
