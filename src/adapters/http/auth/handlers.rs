//! HTTP handlers for authentication endpoints.
//!
//! Login failures share one message whether the email is unknown, the
//! account is inactive or the password is wrong.

use axum::extract::State;

use crate::application::handlers::auth::{
    ChangePasswordCommand, LoginCommand, RegisterCommand, VerifySessionQuery,
};

use super::super::envelope::ApiResponse;
use super::super::error::ApiError;
use super::super::middleware::{OptionalAuth, RequireAuth};
use super::super::state::AppState;
use super::super::user::UserView;
use super::super::validation::ValidatedJson;
use super::dto::{AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest};

/// POST /api/auth/login - Exchange credentials for a session token
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<ApiResponse<AuthResponse>, ApiError> {
    let result = state
        .login_handler()
        .handle(LoginCommand {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(ApiResponse::ok(AuthResponse {
        token: result.token.token,
        expires_at: result.token.expires_at,
        user: UserView::from(&result.user),
    }))
}

/// POST /api/auth/register - Create a member account
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<ApiResponse<AuthResponse>, ApiError> {
    let result = state
        .register_handler()
        .handle(RegisterCommand {
            email: req.email,
            password: req.password,
            name: req.name,
            phone: req.phone,
            department: req.department,
        })
        .await?;

    Ok(ApiResponse::created(AuthResponse {
        token: result.token.token,
        expires_at: result.token.expires_at,
        user: UserView::from(&result.user),
    })
    .with_message("Registro completado"))
}

/// POST /api/auth/logout - Sessions are stateless; the client drops its token
pub async fn logout(OptionalAuth(caller): OptionalAuth) -> ApiResponse<serde_json::Value> {
    if let Some(caller) = caller {
        tracing::info!(user_id = %caller.id, "User logged out");
    }
    ApiResponse::message("Sesión cerrada")
}

/// GET /api/auth/verify - Check the token and return the current account
pub async fn verify(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
) -> Result<ApiResponse<UserView>, ApiError> {
    let user = state
        .verify_session_handler()
        .handle(VerifySessionQuery { user_id: caller.id })
        .await?;
    Ok(ApiResponse::ok(UserView::from(&user)))
}

/// POST /api/auth/change-password - Also mounted as PUT /api/user/password
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    state
        .change_password_handler()
        .handle(ChangePasswordCommand {
            user_id: caller.id,
            current_password: req.current_password,
            new_password: req.new_password,
        })
        .await?;

    Ok(ApiResponse::message("Contraseña actualizada"))
}
