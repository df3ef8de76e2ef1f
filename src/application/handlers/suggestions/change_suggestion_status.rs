//! ChangeSuggestionStatusHandler - admin moderation of the suggestion box.

use std::sync::Arc;

use crate::adapters::email::Notifier;
use crate::application::ApplicationError;
use crate::domain::foundation::{ErrorCode, SuggestionId};
use crate::domain::suggestion::{Suggestion, SuggestionStatus};
use crate::ports::SuggestionRepository;

#[derive(Debug, Clone)]
pub struct ChangeSuggestionStatusCommand {
    pub suggestion_id: SuggestionId,
    pub status: SuggestionStatus,
    pub admin_notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChangeSuggestionStatusResult {
    pub suggestion: Suggestion,
}

pub struct ChangeSuggestionStatusHandler {
    suggestions: Arc<dyn SuggestionRepository>,
    notifier: Notifier,
}

impl ChangeSuggestionStatusHandler {
    pub fn new(suggestions: Arc<dyn SuggestionRepository>, notifier: Notifier) -> Self {
        Self {
            suggestions,
            notifier,
        }
    }

    pub async fn handle(
        &self,
        cmd: ChangeSuggestionStatusCommand,
    ) -> Result<ChangeSuggestionStatusResult, ApplicationError> {
        let mut suggestion = self
            .suggestions
            .find_by_id(&cmd.suggestion_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::not_found(ErrorCode::SuggestionNotFound, "Sugerencia no encontrada")
            })?;

        let notes = cmd.admin_notes.filter(|n| !n.trim().is_empty());
        suggestion.change_status(cmd.status, notes)?;
        self.suggestions.update(&suggestion).await?;
        tracing::info!(suggestion_id = %suggestion.id, status = suggestion.status.as_str(), "Suggestion status changed");

        // Skips anonymous submissions and those without an address.
        self.notifier.suggestion_status_changed(&suggestion).await;

        Ok(ChangeSuggestionStatusResult { suggestion })
    }
}
