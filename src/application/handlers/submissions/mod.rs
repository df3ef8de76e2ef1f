//! Public form handlers guarded by the arithmetic captcha.

mod issue_captcha;
mod submit_affiliation;
mod submit_contact;

pub use issue_captcha::IssueCaptchaHandler;
pub use submit_affiliation::{SubmitAffiliationCommand, SubmitAffiliationHandler};
pub use submit_contact::{SubmitContactCommand, SubmitContactHandler};

/// The `captchaId` / `captchaAnswer` pair every public form carries.
#[derive(Debug, Clone)]
pub struct CaptchaAnswer {
    pub challenge_id: String,
    pub answer: String,
}
