//! Password hashing port.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    /// The stored digest is not a parseable hash string.
    #[error("stored password digest is malformed: {0}")]
    MalformedDigest(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Salted, slow one-way password hashing.
///
/// Both operations are CPU-bound; callers on the async runtime should keep
/// them off hot paths.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;

    /// Ok(false) on mismatch; Err only if the digest itself is unusable.
    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, PasswordError>;

    /// Spends the cost of one verification when there is no account to
    /// check against, so a rejected login takes the same time either way.
    fn verify_absent(&self, plaintext: &str) {
        let _ = self.hash(plaintext);
    }
}
