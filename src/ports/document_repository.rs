//! Document repository port.

use async_trait::async_trait;

use crate::domain::document::Document;
use crate::domain::foundation::{DocumentId, DomainError, UserId};

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn save(&self, document: &Document) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError>;

    /// Documents owned by `owner`, newest first. Never returns another user's documents.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Document>, DomainError>;

    /// Returns false if nothing was deleted.
    async fn delete(&self, id: &DocumentId) -> Result<bool, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}
