//! Axum routers for payments.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{create_checkout_session, payment_history, payment_webhook};

/// # Routes (authenticated)
/// - `POST /create-checkout-session`
/// - `GET /history`
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/create-checkout-session", post(create_checkout_session))
        .route("/history", get(payment_history))
}

/// Mounted at `/api/webhook`. Authenticated by signature, not by session.
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/", post(payment_webhook))
}
