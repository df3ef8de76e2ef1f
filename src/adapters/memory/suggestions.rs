use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, SuggestionId};
use crate::domain::suggestion::{Suggestion, SuggestionStatus};
use crate::ports::SuggestionRepository;

#[derive(Debug, Default)]
pub struct InMemorySuggestionRepository {
    suggestions: RwLock<HashMap<SuggestionId, Suggestion>>,
}

impl InMemorySuggestionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SuggestionRepository for InMemorySuggestionRepository {
    async fn create(&self, suggestion: &Suggestion) -> Result<(), DomainError> {
        self.suggestions
            .write()
            .await
            .insert(suggestion.id, suggestion.clone());
        Ok(())
    }

    async fn update(&self, suggestion: &Suggestion) -> Result<(), DomainError> {
        let mut suggestions = self.suggestions.write().await;
        match suggestions.get_mut(&suggestion.id) {
            Some(existing) => {
                *existing = suggestion.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::SuggestionNotFound,
                format!("Suggestion not found: {}", suggestion.id),
            )),
        }
    }

    async fn find_by_id(&self, id: &SuggestionId) -> Result<Option<Suggestion>, DomainError> {
        Ok(self.suggestions.read().await.get(id).cloned())
    }

    async fn list(&self, status: Option<SuggestionStatus>) -> Result<Vec<Suggestion>, DomainError> {
        let mut list: Vec<Suggestion> = self
            .suggestions
            .read()
            .await
            .values()
            .filter(|s| status.map_or(true, |st| st == s.status))
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn count_by_status(&self, status: SuggestionStatus) -> Result<u64, DomainError> {
        Ok(self
            .suggestions
            .read()
            .await
            .values()
            .filter(|s| s.status == status)
            .count() as u64)
    }
}
