//! Axum router for authentication endpoints.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::adapters::rate_limiter::AUTH_RESOURCE;

use super::super::middleware::{resource_rate_limit, ResourceLimit};
use super::super::state::AppState;
use super::handlers::{change_password, login, logout, register, verify};

/// # Routes
///
/// ## Public
/// - `POST /login` - limited per client address
/// - `POST /register`
/// - `POST /logout`
///
/// ## Authenticated
/// - `GET /verify`
/// - `POST /change-password`
pub fn auth_routes(state: &AppState) -> Router<AppState> {
    let login_limit = ResourceLimit::new(state.rate_limiter.clone(), AUTH_RESOURCE);

    Router::new()
        .route(
            "/login",
            post(login).layer(middleware::from_fn_with_state(login_limit, resource_rate_limit)),
        )
        .route("/register", post(register))
        .route("/logout", post(logout))
        .route("/verify", get(verify))
        .route("/change-password", post(change_password))
}
