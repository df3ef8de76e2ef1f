//! Axum router for the admin panel.

use axum::{
    routing::{get, patch, put},
    Router,
};

use super::super::state::AppState;
use super::handlers::{
    change_user_status, create_event, delete_event, get_stats, get_user, list_affiliations,
    list_contact_messages, list_events, list_unmatched_payments, list_users, update_event,
};

/// # Routes (admin only)
/// - `GET /stats`
/// - `GET /users`, `GET /users/{id}`, `PATCH /users/{id}/status`
/// - `GET|POST /events`, `PUT|DELETE /events/{id}`
/// - `GET /unmatched-payments`, `GET /contact-messages`, `GET /affiliations`
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
        .route("/users/:id/status", patch(change_user_status))
        .route("/events", get(list_events).post(create_event))
        .route("/events/:id", put(update_event).delete(delete_event))
        .route("/unmatched-payments", get(list_unmatched_payments))
        .route("/contact-messages", get(list_contact_messages))
        .route("/affiliations", get(list_affiliations))
}
