//! Session token issuance port.

use serde::Serialize;

use crate::domain::foundation::{AuthError, Timestamp};
use crate::domain::user::User;

/// A freshly signed session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: Timestamp,
}

/// Issues signed, time-boxed session tokens.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user: &User) -> Result<IssuedToken, AuthError>;
}
