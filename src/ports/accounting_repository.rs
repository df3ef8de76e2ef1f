//! Accounting repository ports: transactions, invoices and membership fees.

use async_trait::async_trait;

use crate::domain::accounting::{
    FeePeriod, FeeStatus, Invoice, InvoiceStatus, MembershipFee, Transaction, TransactionKind,
    TransactionStatus,
};
use crate::domain::foundation::{DomainError, FeeId, InvoiceId, TransactionId, UserId};

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn create(&self, transaction: &Transaction) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `TransactionNotFound` if the transaction doesn't exist
    async fn update(&self, transaction: &Transaction) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &TransactionId) -> Result<Option<Transaction>, DomainError>;

    /// Newest first by transaction date.
    async fn list(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, DomainError>;
}

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub status: Option<TransactionStatus>,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.kind.map_or(true, |k| k == tx.kind) && self.status.map_or(true, |s| s == tx.status)
    }
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn create(&self, invoice: &Invoice) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `InvoiceNotFound` if the invoice doesn't exist
    async fn update(&self, invoice: &Invoice) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, DomainError>;

    async fn list(&self, status: Option<InvoiceStatus>) -> Result<Vec<Invoice>, DomainError>;

    /// Number of invoices created in the given calendar year; used for numbering.
    async fn count_for_year(&self, year: i32) -> Result<u64, DomainError>;
}

#[async_trait]
pub trait MembershipFeeRepository: Send + Sync {
    /// # Errors
    ///
    /// - `DuplicateFee` if a fee already exists for the (user, year, month) triple
    async fn create(&self, fee: &MembershipFee) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `FeeNotFound` if the fee doesn't exist
    async fn update(&self, fee: &MembershipFee) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &FeeId) -> Result<Option<MembershipFee>, DomainError>;

    async fn find_for_period(
        &self,
        user_id: &UserId,
        period: FeePeriod,
    ) -> Result<Option<MembershipFee>, DomainError>;

    async fn list(&self, filter: &FeeFilter) -> Result<Vec<MembershipFee>, DomainError>;
}

#[derive(Debug, Clone, Default)]
pub struct FeeFilter {
    pub user_id: Option<UserId>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub status: Option<FeeStatus>,
}

impl FeeFilter {
    pub fn matches(&self, fee: &MembershipFee) -> bool {
        self.user_id.map_or(true, |u| u == fee.user_id)
            && self.year.map_or(true, |y| y == fee.period.year)
            && self.month.map_or(true, |m| m == fee.period.month)
            && self.status.map_or(true, |s| s == fee.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Money;

    #[test]
    fn fee_filter_matches_each_dimension() {
        let user = UserId::new();
        let fee = MembershipFee::new(
            user,
            FeePeriod::new(2024, 6).unwrap(),
            Money::from_cents(1200),
        )
        .unwrap();

        assert!(FeeFilter::default().matches(&fee));
        assert!(FeeFilter {
            user_id: Some(user),
            year: Some(2024),
            month: Some(6),
            status: Some(FeeStatus::Pending),
        }
        .matches(&fee));
        assert!(!FeeFilter {
            month: Some(7),
            ..Default::default()
        }
        .matches(&fee));
    }

    #[test]
    fn repositories_are_object_safe() {
        fn _tx(_r: &dyn TransactionRepository) {}
        fn _inv(_r: &dyn InvoiceRepository) {}
        fn _fee(_r: &dyn MembershipFeeRepository) {}
    }
}
