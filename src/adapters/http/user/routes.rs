//! Axum router for the caller's account.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::super::auth::handlers::change_password;
use super::super::state::AppState;
use super::handlers::{
    course_certificate, delete_photo, get_membership, get_profile, my_courses, update_profile,
    upload_photo,
};

/// # Routes (all require authentication)
/// - `GET|PUT /profile`
/// - `PUT|DELETE /photo`
/// - `PUT /password`
/// - `GET /courses`
/// - `POST /courses/{id}/certificate`
/// - `GET /membership`
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/photo", put(upload_photo).delete(delete_photo))
        .route("/password", put(change_password))
        .route("/courses", get(my_courses))
        .route("/courses/:id/certificate", post(course_certificate))
        .route("/membership", get(get_membership))
}
