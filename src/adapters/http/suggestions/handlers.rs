//! HTTP handlers for the suggestion box.
//!
//! Responses always go through `Suggestion::public_view`, so anonymous
//! submissions never expose who sent them, not even to admins.

use axum::extract::State;
use serde_json::Value;

use crate::application::handlers::suggestions::{
    ChangeSuggestionStatusCommand, SubmitSuggestionCommand,
};
use crate::domain::foundation::{DomainError, SuggestionId};
use crate::domain::suggestion::{NewSuggestion, SuggestionStatus};

use super::super::envelope::ApiResponse;
use super::super::error::ApiError;
use super::super::middleware::{ClientIp, RequireAdmin};
use super::super::params::{parse_id, ApiPath, ApiQuery};
use super::super::state::AppState;
use super::super::validation::ValidatedJson;
use super::dto::{ChangeStatusRequest, SubmitSuggestionRequest, SuggestionListQuery};

/// POST /api/suggestions - Public, limited per client address
pub async fn submit_suggestion(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    ValidatedJson(req): ValidatedJson<SubmitSuggestionRequest>,
) -> Result<ApiResponse<Value>, ApiError> {
    let urgency = req.urgency();
    let result = state
        .submit_suggestion_handler()
        .handle(SubmitSuggestionCommand {
            suggestion: NewSuggestion {
                category: req.category,
                message: req.message,
                urgency,
                is_anonymous: req.is_anonymous,
                name: req.name,
                email: req.email,
                ip_address: ip,
            },
        })
        .await?;

    Ok(ApiResponse::created(result.suggestion.public_view())
        .with_message("Sugerencia enviada. Gracias por tu aportación"))
}

/// GET /api/suggestions - Admin listing, optionally filtered by status
pub async fn list_suggestions(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiQuery(query): ApiQuery<SuggestionListQuery>,
) -> Result<ApiResponse<Vec<Value>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<SuggestionStatus>)
        .transpose()
        .map_err(DomainError::from)?;

    let suggestions = state.suggestions.list(status).await?;
    Ok(ApiResponse::ok(
        suggestions.iter().map(|s| s.public_view()).collect(),
    ))
}

/// PATCH /api/suggestions/{id}/status - Move a suggestion through moderation
pub async fn change_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<String>,
    ValidatedJson(req): ValidatedJson<ChangeStatusRequest>,
) -> Result<ApiResponse<Value>, ApiError> {
    let suggestion_id: SuggestionId = parse_id(&id, "Sugerencia no encontrada")?;
    let status = req
        .status
        .parse::<SuggestionStatus>()
        .map_err(DomainError::from)?;

    let result = state
        .suggestion_status_handler()
        .handle(ChangeSuggestionStatusCommand {
            suggestion_id,
            status,
            admin_notes: req.admin_notes,
        })
        .await?;

    tracing::info!(
        admin_id = %admin.id,
        suggestion_id = %suggestion_id,
        status = status.as_str(),
        "Suggestion status changed"
    );
    Ok(ApiResponse::ok(result.suggestion.public_view()))
}
