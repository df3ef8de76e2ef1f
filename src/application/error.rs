//! Errors surfaced by application handlers.

use thiserror::Error;

use crate::domain::captcha::CaptchaError;
use crate::domain::foundation::{AuthError, DomainError, ErrorCode};
use crate::domain::payment::WebhookError;
use crate::ports::{PasswordError, PaymentError, RenderError};

/// Message shared by every failed login so responses never reveal whether
/// the email exists.
pub const INVALID_CREDENTIALS: &str = "Email o contraseña incorrectos";

#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Unknown email, wrong password or inactive account.
    #[error("{}", INVALID_CREDENTIALS)]
    InvalidCredentials,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Captcha(#[from] CaptchaError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Webhook(#[from] WebhookError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ApplicationError {
    pub fn not_found(code: ErrorCode, message: impl Into<String>) -> Self {
        ApplicationError::Domain(DomainError::new(code, message))
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApplicationError::Domain(DomainError::validation(field, message))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApplicationError::Domain(DomainError::new(ErrorCode::Forbidden, message))
    }

    /// Domain error code, when this wraps one.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ApplicationError::Domain(e) => Some(e.code),
            _ => None,
        }
    }
}
