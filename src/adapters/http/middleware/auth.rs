//! Authentication middleware and extractors for axum.
//!
//! - `auth_middleware` - validates Bearer tokens and injects the caller into extensions
//! - `RequireAuth` - extractor for member routes
//! - `RequireAdmin` - extractor for admin routes
//! - `OptionalAuth` - extractor for routes that behave the same either way
//!
//! ```text
//! Request → auth_middleware → injects AuthenticatedUser into extensions
//!                                      ↓
//!                              Handler → RequireAuth / RequireAdmin
//! ```
//!
//! A missing token passes through untouched; protection is decided by the
//! extractor each handler asks for. A token that is present but invalid is
//! rejected immediately.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::domain::foundation::AuthenticatedUser;
use crate::ports::SessionValidator;

use super::super::error::{ApiError, AUTHENTICATION_REQUIRED};

/// Auth middleware state - wraps the session validator.
pub type AuthState = Arc<dyn SessionValidator>;

/// Validates `Authorization: Bearer <token>` when present.
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim);

    let Some(token) = token else {
        return next.run(request).await;
    };

    match validator.validate(token).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected session token");
            ApiError::from(e).into_response()
        }
    }
}

/// Extractor that requires an authenticated caller.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(RequireAuth)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

/// Extractor that requires an authenticated caller with the admin role.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AuthRejection::Unauthenticated)?;
        if !user.is_admin() {
            tracing::info!(user_id = %user.id, "Admin route refused for member");
            return Err(AuthRejection::NotAdmin);
        }
        Ok(RequireAdmin(user))
    }
}

/// Extractor for optional authentication.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<AuthenticatedUser>().cloned();
        Ok(OptionalAuth(user))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No valid token was provided.
    Unauthenticated,
    /// Valid token, but the caller is not an admin.
    NotAdmin,
}

impl From<AuthRejection> for ApiError {
    fn from(rejection: AuthRejection) -> Self {
        match rejection {
            AuthRejection::Unauthenticated => ApiError::Unauthorized(AUTHENTICATION_REQUIRED),
            AuthRejection::NotAdmin => {
                ApiError::forbidden("Acceso restringido a administradores")
            }
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use secrecy::SecretString;
    use tower::ServiceExt;

    use crate::adapters::auth::JwtSessionService;
    use crate::domain::foundation::{Email, Role, UserId};
    use crate::domain::user::{Profile, User};
    use crate::ports::TokenIssuer;

    fn sessions() -> Arc<JwtSessionService> {
        let secret = SecretString::new("middleware-test-secret-0123456789abcdef".to_string());
        Arc::new(JwtSessionService::new(&secret, 3600))
    }

    fn user(role: Role) -> User {
        User::register(
            Email::parse("socia@example.com").unwrap(),
            "$argon2id$stub",
            Profile::default(),
            role,
        )
    }

    fn caller(role: Role) -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new(), "socia@example.com", role)
    }

    async fn whoami(RequireAuth(user): RequireAuth) -> String {
        user.email
    }

    fn app(sessions: Arc<JwtSessionService>) -> Router {
        let state: AuthState = sessions;
        Router::new()
            .route("/me", get(whoami))
            .layer(axum::middleware::from_fn_with_state(state, auth_middleware))
    }

    fn request(token: Option<&str>) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder().uri("/me");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Middleware
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn valid_token_reaches_handler() {
        let sessions = sessions();
        let token = sessions.issue(&user(Role::Member)).unwrap().token;

        let response = app(sessions).oneshot(request(Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn forged_token_is_rejected_before_handler() {
        let response = app(sessions())
            .oneshot(request(Some("not-a-jwt")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_token_is_rejected_by_extractor() {
        let response = app(sessions()).oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Extractors
    // ════════════════════════════════════════════════════════════════════════════

    fn parts_with(user: Option<AuthenticatedUser>) -> axum::http::request::Parts {
        let mut request = HttpRequest::builder().uri("/test").body(()).unwrap();
        if let Some(user) = user {
            request.extensions_mut().insert(user);
        }
        request.into_parts().0
    }

    #[tokio::test]
    async fn require_admin_refuses_members() {
        let mut parts = parts_with(Some(caller(Role::Member)));
        let result = RequireAdmin::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthRejection::NotAdmin)));
        assert_eq!(
            AuthRejection::NotAdmin.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn require_admin_accepts_admins() {
        let mut parts = parts_with(Some(caller(Role::Admin)));
        let RequireAdmin(user) = RequireAdmin::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn require_auth_fails_without_user() {
        let mut parts = parts_with(None);
        let result = RequireAuth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthRejection::Unauthenticated)));
    }

    #[tokio::test]
    async fn optional_auth_is_none_when_absent() {
        let mut parts = parts_with(None);
        let OptionalAuth(user) = OptionalAuth::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(user.is_none());
    }
}
