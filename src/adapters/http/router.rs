//! Assembles every route group behind the shared middleware stack.
//!
//! Layer order, outermost first: request id, trace, CORS, timeout,
//! compression, the optional development-only error detail, trusted proxy
//! list, global rate limit, then session decoding.

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::{middleware, Extension, Router};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::accounting::accounting_routes;
use super::admin::admin_routes;
use super::auth::auth_routes;
use super::content::{course_routes, event_routes};
use super::documents::document_routes;
use super::forms::form_routes;
use super::health::health_routes;
use super::middleware::{
    auth_middleware, expose_internal_detail, rate_limit_middleware, TrustedProxies,
};
use super::payment::{payment_routes, webhook_routes};
use super::state::{AppState, PortalSettings};
use super::suggestions::suggestion_routes;
use super::user::user_routes;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Profile photos arrive base64-encoded inside JSON.
pub const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", auth_routes(&state))
        .nest("/user", user_routes())
        .nest("/courses", course_routes())
        .nest("/events", event_routes())
        .nest("/documents", document_routes())
        .nest("/admin", admin_routes())
        .nest("/accounting", accounting_routes())
        .nest("/suggestions", suggestion_routes(&state))
        .nest("/payment", payment_routes())
        .nest("/webhook", webhook_routes())
        .merge(form_routes());

    let mut app = Router::new()
        .nest("/api", api)
        .merge(health_routes())
        .layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            auth_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit_middleware,
        ))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(Extension(TrustedProxies::new(
            state.settings.trusted_proxies.iter().copied(),
        )));

    if state.settings.is_development() {
        app = app.layer(middleware::from_fn(expose_internal_detail));
    }

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let settings = state.settings.clone();

    app.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(request_id))
            .layer(cors_layer(&settings))
            .layer(TimeoutLayer::new(Duration::from_secs(
                settings.request_timeout_secs,
            )))
            .layer(CompressionLayer::new()),
    )
    .with_state(state)
}

/// `*` allows any origin; otherwise only the listed ones. Unparseable
/// entries are skipped with a warning.
fn cors_layer(settings: &PortalSettings) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(Duration::from_secs(60 * 60));

    if settings.cors_origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = settings
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(origins))
}
