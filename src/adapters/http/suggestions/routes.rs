//! Axum router for the suggestion box.

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::adapters::rate_limiter::SUGGESTIONS_RESOURCE;

use super::super::middleware::{resource_rate_limit, ResourceLimit};
use super::super::state::AppState;
use super::handlers::{change_status, list_suggestions, submit_suggestion};

/// # Routes
/// - `POST /` - public, fixed window per client address
/// - `GET /` - admin
/// - `PATCH /{id}/status` - admin
pub fn suggestion_routes(state: &AppState) -> Router<AppState> {
    let submit_limit = ResourceLimit::new(state.rate_limiter.clone(), SUGGESTIONS_RESOURCE);

    Router::new()
        .route(
            "/",
            get(list_suggestions).merge(
                post(submit_suggestion)
                    .layer(middleware::from_fn_with_state(submit_limit, resource_rate_limit)),
            ),
        )
        .route("/:id/status", patch(change_status))
}
