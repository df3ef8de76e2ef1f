//! Session validation port.
//!
//! HTTP middleware uses this to turn a Bearer token into an
//! [`AuthenticatedUser`].
//!
//! # Contract
//!
//! Implementations must:
//! - Verify the token signature
//! - Return `AuthError::MalformedToken` for tokens that cannot be decoded
//! - Return `AuthError::InvalidSignature` for tokens signed with another key
//! - Return `AuthError::TokenExpired` for well-signed tokens past their expiry

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
