use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::document::Document;
use crate::domain::foundation::{DocumentId, DomainError, UserId};
use crate::ports::DocumentRepository;

#[derive(Debug, Default)]
pub struct InMemoryDocumentRepository {
    documents: RwLock<HashMap<DocumentId, Document>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn save(&self, document: &Document) -> Result<(), DomainError> {
        self.documents
            .write()
            .await
            .insert(document.id(), document.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError> {
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Document>, DomainError> {
        let documents = self.documents.read().await;
        let mut owned: Vec<Document> = documents
            .values()
            .filter(|d| d.is_owned_by(owner))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(owned)
    }

    async fn delete(&self, id: &DocumentId) -> Result<bool, DomainError> {
        Ok(self.documents.write().await.remove(id).is_some())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.documents.read().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::{DocumentMetadata, DocumentType};

    #[tokio::test]
    async fn list_by_owner_never_leaks_other_owners() {
        let repo = InMemoryDocumentRepository::new();
        let alice = UserId::new();
        let bob = UserId::new();
        for owner in [alice, bob, alice] {
            let doc = Document::new(
                owner,
                DocumentType::MembershipForm,
                b"%PDF".to_vec(),
                DocumentMetadata::default(),
            );
            repo.save(&doc).await.unwrap();
        }

        let docs = repo.list_by_owner(&alice).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|d| d.is_owned_by(&alice)));
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn delete_reports_presence() {
        let repo = InMemoryDocumentRepository::new();
        let doc = Document::new(
            UserId::new(),
            DocumentType::PaymentReceipt,
            vec![1, 2, 3],
            DocumentMetadata::default(),
        );
        repo.save(&doc).await.unwrap();

        assert!(repo.delete(&doc.id()).await.unwrap());
        assert!(!repo.delete(&doc.id()).await.unwrap());
    }
}
