//! Axum routers for courses and events.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{enroll_course, get_course, list_courses, list_events, mark_event_read};

/// # Routes (all require authentication)
/// - `GET /` - Visible courses
/// - `GET /{id}` - One course
/// - `POST /{id}/enroll` - Enrol the caller
pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses))
        .route("/:id", get(get_course))
        .route("/:id/enroll", post(enroll_course))
}

/// # Routes (all require authentication)
/// - `GET /` - Visible events with read flag
/// - `POST /{id}/read` - Acknowledge an event
pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events))
        .route("/:id/read", post(mark_event_read))
}
