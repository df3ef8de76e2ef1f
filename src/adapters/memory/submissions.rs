use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::domain::payment::UnmatchedPayment;
use crate::domain::submission::{AffiliationRequest, ContactMessage};
use crate::ports::{SubmissionRepository, UnmatchedPaymentRepository};

#[derive(Debug, Default)]
pub struct InMemorySubmissionRepository {
    contacts: RwLock<Vec<ContactMessage>>,
    affiliations: RwLock<Vec<AffiliationRequest>>,
}

impl InMemorySubmissionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepository {
    async fn save_contact(&self, message: &ContactMessage) -> Result<(), DomainError> {
        self.contacts.write().await.push(message.clone());
        Ok(())
    }

    async fn list_contacts(&self) -> Result<Vec<ContactMessage>, DomainError> {
        let mut list = self.contacts.read().await.clone();
        list.reverse();
        Ok(list)
    }

    async fn save_affiliation(&self, request: &AffiliationRequest) -> Result<(), DomainError> {
        self.affiliations.write().await.push(request.clone());
        Ok(())
    }

    async fn list_affiliations(&self) -> Result<Vec<AffiliationRequest>, DomainError> {
        let mut list = self.affiliations.read().await.clone();
        list.reverse();
        Ok(list)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUnmatchedPaymentRepository {
    payments: RwLock<Vec<UnmatchedPayment>>,
}

impl InMemoryUnmatchedPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UnmatchedPaymentRepository for InMemoryUnmatchedPaymentRepository {
    async fn record(&self, payment: &UnmatchedPayment) -> Result<bool, DomainError> {
        let mut payments = self.payments.write().await;
        if payments.iter().any(|p| p.session_id == payment.session_id) {
            return Ok(false);
        }
        payments.push(payment.clone());
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<UnmatchedPayment>, DomainError> {
        let mut list = self.payments.read().await.clone();
        list.reverse();
        Ok(list)
    }

    async fn count_unresolved(&self) -> Result<u64, DomainError> {
        Ok(self
            .payments
            .read()
            .await
            .iter()
            .filter(|p| !p.resolved)
            .count() as u64)
    }
}
