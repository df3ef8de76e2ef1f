use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::accounting::{FeePeriod, Invoice, InvoiceStatus, MembershipFee, Transaction};
use crate::domain::foundation::{
    DomainError, ErrorCode, FeeId, InvoiceId, TransactionId, UserId,
};
use crate::ports::{
    FeeFilter, InvoiceRepository, MembershipFeeRepository, TransactionFilter,
    TransactionRepository,
};

// ════════════════════════════════════════════════════════════════════════════════
// Transactions
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct InMemoryTransactionRepository {
    transactions: RwLock<HashMap<TransactionId, Transaction>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn create(&self, transaction: &Transaction) -> Result<(), DomainError> {
        self.transactions
            .write()
            .await
            .insert(transaction.id, transaction.clone());
        Ok(())
    }

    async fn update(&self, transaction: &Transaction) -> Result<(), DomainError> {
        let mut transactions = self.transactions.write().await;
        match transactions.get_mut(&transaction.id) {
            Some(existing) => {
                *existing = transaction.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::TransactionNotFound,
                format!("Transaction not found: {}", transaction.id),
            )),
        }
    }

    async fn find_by_id(&self, id: &TransactionId) -> Result<Option<Transaction>, DomainError> {
        Ok(self.transactions.read().await.get(id).cloned())
    }

    async fn list(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, DomainError> {
        let mut list: Vec<Transaction> = self
            .transactions
            .read()
            .await
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        list.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(list)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Invoices
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct InMemoryInvoiceRepository {
    invoices: RwLock<HashMap<InvoiceId, Invoice>>,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn create(&self, invoice: &Invoice) -> Result<(), DomainError> {
        let mut stored = invoice.clone();
        stored.recompute_totals()?;
        self.invoices.write().await.insert(stored.id(), stored);
        Ok(())
    }

    async fn update(&self, invoice: &Invoice) -> Result<(), DomainError> {
        let mut invoices = self.invoices.write().await;
        match invoices.get_mut(&invoice.id()) {
            Some(existing) => {
                let mut stored = invoice.clone();
                stored.recompute_totals()?;
                *existing = stored;
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::InvoiceNotFound,
                format!("Invoice not found: {}", invoice.id()),
            )),
        }
    }

    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, DomainError> {
        Ok(self.invoices.read().await.get(id).cloned())
    }

    async fn list(&self, status: Option<InvoiceStatus>) -> Result<Vec<Invoice>, DomainError> {
        let mut list: Vec<Invoice> = self
            .invoices
            .read()
            .await
            .values()
            .filter(|i| status.map_or(true, |s| s == i.status()))
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(list)
    }

    async fn count_for_year(&self, year: i32) -> Result<u64, DomainError> {
        Ok(self
            .invoices
            .read()
            .await
            .values()
            .filter(|i| i.created_at().year() == year)
            .count() as u64)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Membership fees
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct InMemoryMembershipFeeRepository {
    fees: RwLock<HashMap<FeeId, MembershipFee>>,
}

impl InMemoryMembershipFeeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MembershipFeeRepository for InMemoryMembershipFeeRepository {
    async fn create(&self, fee: &MembershipFee) -> Result<(), DomainError> {
        let mut fees = self.fees.write().await;
        if fees
            .values()
            .any(|f| f.user_id == fee.user_id && f.period == fee.period)
        {
            return Err(DomainError::new(
                ErrorCode::DuplicateFee,
                format!("Fee already exists for {} in {}", fee.user_id, fee.period),
            ));
        }
        fees.insert(fee.id, fee.clone());
        Ok(())
    }

    async fn update(&self, fee: &MembershipFee) -> Result<(), DomainError> {
        let mut fees = self.fees.write().await;
        match fees.get_mut(&fee.id) {
            Some(existing) => {
                *existing = fee.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::FeeNotFound,
                format!("Fee not found: {}", fee.id),
            )),
        }
    }

    async fn find_by_id(&self, id: &FeeId) -> Result<Option<MembershipFee>, DomainError> {
        Ok(self.fees.read().await.get(id).cloned())
    }

    async fn find_for_period(
        &self,
        user_id: &UserId,
        period: FeePeriod,
    ) -> Result<Option<MembershipFee>, DomainError> {
        Ok(self
            .fees
            .read()
            .await
            .values()
            .find(|f| &f.user_id == user_id && f.period == period)
            .cloned())
    }

    async fn list(&self, filter: &FeeFilter) -> Result<Vec<MembershipFee>, DomainError> {
        let mut list: Vec<MembershipFee> = self
            .fees
            .read()
            .await
            .values()
            .filter(|f| filter.matches(f))
            .cloned()
            .collect();
        list.sort_by(|a, b| b.period.cmp(&a.period));
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::accounting::{Customer, LineItem};
    use crate::domain::foundation::Money;

    #[tokio::test]
    async fn duplicate_fee_period_is_a_conflict() {
        let repo = InMemoryMembershipFeeRepository::new();
        let user = UserId::new();
        let period = FeePeriod::new(2024, 3).unwrap();
        repo.create(&MembershipFee::new(user, period, Money::from_cents(1000)).unwrap())
            .await
            .unwrap();

        let err = repo
            .create(&MembershipFee::new(user, period, Money::from_cents(1000)).unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateFee);
        assert!(err.code.is_conflict());

        let other_month = FeePeriod::new(2024, 4).unwrap();
        assert!(repo
            .create(&MembershipFee::new(user, other_month, Money::from_cents(1000)).unwrap())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn stored_invoice_totals_match_line_items() {
        let repo = InMemoryInvoiceRepository::new();
        let invoice = Invoice::draft(
            "FAC-2024-0001",
            Customer {
                name: "Cooperativa".into(),
                email: None,
                user_id: None,
            },
            vec![LineItem {
                description: "Taller".into(),
                quantity: 2,
                unit_price: Money::from_cents(1000),
            }],
            21.0,
            None,
            None,
        )
        .unwrap();
        repo.create(&invoice).await.unwrap();

        let loaded = repo.find_by_id(&invoice.id()).await.unwrap().unwrap();
        assert_eq!(loaded.totals().total, Money::from_cents(2420));
        assert_eq!(repo.count_for_year(invoice.created_at().year()).await.unwrap(), 1);
    }
}
