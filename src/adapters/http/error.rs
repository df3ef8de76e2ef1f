//! `ApiError` is the single place where failures become HTTP responses.
//!
//! | Error                         | Status |
//! |-------------------------------|--------|
//! | validation, malformed body    | 400    |
//! | authentication                | 401    |
//! | authorization                 | 403    |
//! | missing resource              | 404    |
//! | conflict, illegal transition  | 409    |
//! | rate limited                  | 429    |
//! | everything else               | 500    |
//!
//! Internal error text is logged and attached to the response as an
//! [`InternalDetail`] extension. Only the development-mode layer copies it
//! into the body.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::application::{ApplicationError, INVALID_CREDENTIALS};
use crate::domain::captcha::CaptchaError;
use crate::domain::foundation::{AuthError, DomainError, ErrorCode};
use crate::ports::{PaymentErrorCode, RenderError};

use super::envelope::ErrorBody;
use super::validation::FieldError;

pub const AUTHENTICATION_REQUIRED: &str = "Autenticación requerida";
pub const SESSION_INVALID: &str = "Sesión no válida. Inicia sesión de nuevo";
pub const SESSION_EXPIRED: &str = "La sesión ha caducado";
pub const INTERNAL_MESSAGE: &str = "Error interno del servidor";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Datos no válidos")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Demasiadas solicitudes. Inténtalo más tarde")]
    RateLimited { retry_after_secs: u32 },

    #[error("{0}")]
    Internal(String),
}

/// Internal failure text carried on 500 responses for the development layer.
#[derive(Debug, Clone)]
pub struct InternalDetail(pub String);

impl ApiError {
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation(vec![FieldError::new(field, message)])
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn internal(detail: impl ToString) -> Self {
        ApiError::Internal(detail.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::RateLimited { .. } => "RATE_LIMITED",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = ErrorBody::new(self.code(), self.to_string());

        match self {
            ApiError::Validation(fields) => {
                body.fields = fields;
                (status, Json(body)).into_response()
            }
            ApiError::RateLimited { retry_after_secs } => {
                let mut response = (status, Json(body)).into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
                response
            }
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed with internal error");
                body.message = INTERNAL_MESSAGE.to_string();
                let mut response = (status, Json(body)).into_response();
                response.extensions_mut().insert(InternalDetail(detail));
                response
            }
            _ => (status, Json(body)).into_response(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => {
                let field = err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "request".to_string());
                ApiError::field(field, err.message)
            }
            code if code.is_not_found() => ApiError::NotFound(err.message),
            code if code.is_conflict() => ApiError::Conflict(err.message),
            ErrorCode::InvalidStateTransition => ApiError::Conflict(err.message),
            ErrorCode::AccountInactive | ErrorCode::Unauthorized => {
                ApiError::Unauthorized(SESSION_INVALID)
            }
            ErrorCode::Forbidden => ApiError::Forbidden(err.message),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenExpired => ApiError::Unauthorized(SESSION_EXPIRED),
            AuthError::InsufficientPermissions => {
                ApiError::Forbidden("No tienes permisos para esta acción".to_string())
            }
            AuthError::ServiceUnavailable(msg) => ApiError::Internal(msg),
            _ => ApiError::Unauthorized(SESSION_INVALID),
        }
    }
}

impl From<CaptchaError> for ApiError {
    fn from(err: CaptchaError) -> Self {
        match err {
            CaptchaError::Store(msg) => ApiError::Internal(msg),
            CaptchaError::WrongAnswer { remaining } => ApiError::field(
                "captchaAnswer",
                format!("Respuesta incorrecta. Te quedan {} intentos", remaining),
            ),
            CaptchaError::NotFound | CaptchaError::Exhausted => ApiError::field(
                "captchaId",
                "El captcha ha caducado. Solicita uno nuevo",
            ),
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::InvalidCredentials => ApiError::Unauthorized(INVALID_CREDENTIALS),
            ApplicationError::Auth(e) => e.into(),
            ApplicationError::Domain(e) => e.into(),
            ApplicationError::Captcha(e) => e.into(),
            ApplicationError::Payment(e) => match e.code {
                PaymentErrorCode::InvalidRequest => ApiError::BadRequest(e.message),
                _ => ApiError::Internal(e.to_string()),
            },
            ApplicationError::Webhook(e) => ApiError::BadRequest(e.to_string()),
            ApplicationError::Render(RenderError::MissingData { field, .. }) => {
                ApiError::field(field, "Dato necesario para generar el documento")
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}
