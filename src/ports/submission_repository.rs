//! Storage for public form submissions and unmatched payments.
//!
//! These records are append-only from the public side and read by admins.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::payment::UnmatchedPayment;
use crate::domain::submission::{AffiliationRequest, ContactMessage};

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn save_contact(&self, message: &ContactMessage) -> Result<(), DomainError>;

    async fn list_contacts(&self) -> Result<Vec<ContactMessage>, DomainError>;

    async fn save_affiliation(&self, request: &AffiliationRequest) -> Result<(), DomainError>;

    async fn list_affiliations(&self) -> Result<Vec<AffiliationRequest>, DomainError>;
}

/// Queue of completed payments that matched no account.
#[async_trait]
pub trait UnmatchedPaymentRepository: Send + Sync {
    /// Records the payment. Recording the same session twice keeps one entry
    /// and returns false the second time.
    async fn record(&self, payment: &UnmatchedPayment) -> Result<bool, DomainError>;

    async fn list(&self) -> Result<Vec<UnmatchedPayment>, DomainError>;

    async fn count_unresolved(&self) -> Result<u64, DomainError>;
}
