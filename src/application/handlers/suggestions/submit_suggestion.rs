//! SubmitSuggestionHandler - stores a suggestion-box entry as `pendiente`.
//!
//! Per-address throttling happens in the HTTP layer before this runs.

use std::sync::Arc;

use crate::application::ApplicationError;
use crate::domain::foundation::DomainError;
use crate::domain::suggestion::{NewSuggestion, Suggestion};
use crate::ports::SuggestionRepository;

#[derive(Debug, Clone)]
pub struct SubmitSuggestionCommand {
    pub suggestion: NewSuggestion,
}

#[derive(Debug, Clone)]
pub struct SubmitSuggestionResult {
    pub suggestion: Suggestion,
}

pub struct SubmitSuggestionHandler {
    suggestions: Arc<dyn SuggestionRepository>,
}

impl SubmitSuggestionHandler {
    pub fn new(suggestions: Arc<dyn SuggestionRepository>) -> Self {
        Self { suggestions }
    }

    pub async fn handle(
        &self,
        cmd: SubmitSuggestionCommand,
    ) -> Result<SubmitSuggestionResult, ApplicationError> {
        let suggestion = Suggestion::submit(cmd.suggestion).map_err(DomainError::from)?;
        self.suggestions.create(&suggestion).await?;

        tracing::info!(
            suggestion_id = %suggestion.id,
            urgency = ?suggestion.urgency,
            anonymous = suggestion.is_anonymous,
            "Suggestion submitted"
        );

        Ok(SubmitSuggestionResult { suggestion })
    }
}
