//! Liveness check.

use axum::{routing::get, Router};
use serde::Serialize;

use super::envelope::ApiResponse;
use super::state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

/// GET /health
pub async fn health() -> ApiResponse<Health> {
    ApiResponse::ok(Health { status: "ok" })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
