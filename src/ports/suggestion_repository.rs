//! Suggestion repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SuggestionId};
use crate::domain::suggestion::{Suggestion, SuggestionStatus};

#[async_trait]
pub trait SuggestionRepository: Send + Sync {
    async fn create(&self, suggestion: &Suggestion) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `SuggestionNotFound` if the suggestion doesn't exist
    async fn update(&self, suggestion: &Suggestion) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &SuggestionId) -> Result<Option<Suggestion>, DomainError>;

    /// Newest first, optionally restricted to one status.
    async fn list(&self, status: Option<SuggestionStatus>) -> Result<Vec<Suggestion>, DomainError>;

    async fn count_by_status(&self, status: SuggestionStatus) -> Result<u64, DomainError>;
}
