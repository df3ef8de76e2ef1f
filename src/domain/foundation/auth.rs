//! Authentication types for the domain layer.
//!
//! `AuthenticatedUser` is what the HTTP layer knows about the caller after a
//! session token has been validated. It carries only the claims handlers need.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::UserId;

/// Account role.
///
/// Historic records use `afiliado` for members; both spellings deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    #[serde(alias = "afiliado")]
    Member,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" | "afiliado" => Ok(Role::Member),
            "admin" => Ok(Role::Admin),
            _ => Err(AuthError::MalformedToken),
        }
    }
}

/// Caller identity extracted from a validated session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            email: email.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Authentication errors that can occur during token handling.
///
/// Malformed, expired and forged tokens are distinct so callers can choose
/// between asking for a fresh login and attempting a refresh.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The token could not be decoded or is missing required claims.
    #[error("Malformed token")]
    MalformedToken,

    /// The token's signature does not match the signing secret.
    #[error("Invalid token signature")]
    InvalidSignature,

    /// The token was valid but its expiry has passed.
    #[error("Token expired")]
    TokenExpired,

    /// The token is valid but the account no longer exists.
    #[error("User not found")]
    UserNotFound,

    /// The account exists but is not active.
    #[error("Account inactive")]
    AccountInactive,

    /// Authenticated but lacking the required role.
    #[error("Insufficient permissions")]
    InsufficientPermissions,

    /// Token issuance failed.
    #[error("Token service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// The client must log in again; the credential is unusable.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AuthError::MalformedToken
                | AuthError::InvalidSignature
                | AuthError::UserNotFound
                | AuthError::AccountInactive
        )
    }

    /// The credential was genuine and only its lifetime ran out.
    pub fn can_refresh(&self) -> bool {
        matches!(self, AuthError::TokenExpired)
    }
}
