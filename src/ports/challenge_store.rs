//! Captcha challenge store port.
//!
//! Challenges are short-lived shared state. Implementations must expire
//! entries after their TTL and delete them after a correct answer or once
//! the wrong-answer budget is spent.

use async_trait::async_trait;

use crate::domain::captcha::{CaptchaError, Challenge};
use crate::domain::foundation::ChallengeId;

#[async_trait]
pub trait ChallengeStore: Send + Sync {
    async fn put(&self, challenge: &Challenge) -> Result<(), CaptchaError>;

    /// Consumes the challenge on a correct answer.
    ///
    /// # Errors
    ///
    /// - `NotFound` for unknown, solved or expired challenges
    /// - `WrongAnswer` with the remaining attempts
    /// - `Exhausted` when the last attempt was used; the challenge is gone
    async fn verify(&self, id: &ChallengeId, answer: &str) -> Result<(), CaptchaError>;
}
