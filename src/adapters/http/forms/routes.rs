//! Axum routers for the public forms.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{issue_captcha, submit_affiliation, submit_contact};

/// # Routes (public)
/// - `GET /captcha`
/// - `POST /contact/submit` - requires a solved captcha
/// - `POST /affiliations/submit` - requires a solved captcha
pub fn form_routes() -> Router<AppState> {
    Router::new()
        .route("/captcha", get(issue_captcha))
        .route("/contact/submit", post(submit_contact))
        .route("/affiliations/submit", post(submit_affiliation))
}
