//! HTTP DTOs for the public forms.
//!
//! Only size limits and the captcha fields are checked here. Field content
//! is validated after the captcha has been answered.

use serde::{Deserialize, Serialize};

use crate::application::handlers::submissions::CaptchaAnswer;
use crate::domain::foundation::{SubmissionId, Timestamp};

use super::super::validation::{FieldError, Validate, Validator};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub captcha_id: String,
    #[serde(default)]
    pub captcha_answer: String,
}

impl Validate for ContactRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        captcha_fields(&mut v, &self.captcha_id, &self.captcha_answer);
        v.field("name", Some(self.name.as_str())).max_len(100);
        v.field("email", Some(self.email.as_str())).max_len(254);
        v.field("subject", Some(self.subject.as_str())).max_len(200);
        v.field("message", Some(self.message.as_str())).max_len(5000);
        v.finish()
    }
}

impl ContactRequest {
    pub fn captcha(&self) -> CaptchaAnswer {
        CaptchaAnswer {
            challenge_id: self.captcha_id.clone(),
            answer: self.captcha_answer.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliationSubmitRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub workplace: Option<String>,
    pub comments: Option<String>,
    #[serde(default)]
    pub captcha_id: String,
    #[serde(default)]
    pub captcha_answer: String,
}

impl Validate for AffiliationSubmitRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        captcha_fields(&mut v, &self.captcha_id, &self.captcha_answer);
        v.field("name", Some(self.name.as_str())).max_len(100);
        v.field("email", Some(self.email.as_str())).max_len(254);
        v.field("phone", self.phone.as_deref()).max_len(30);
        v.field("department", self.department.as_deref()).max_len(100);
        v.field("workplace", self.workplace.as_deref()).max_len(200);
        v.field("comments", self.comments.as_deref()).max_len(2000);
        v.finish()
    }
}

impl AffiliationSubmitRequest {
    pub fn captcha(&self) -> CaptchaAnswer {
        CaptchaAnswer {
            challenge_id: self.captcha_id.clone(),
            answer: self.captcha_answer.clone(),
        }
    }
}

fn captcha_fields(v: &mut Validator, id: &str, answer: &str) {
    v.field("captchaId", Some(id)).required();
    v.field("captchaAnswer", Some(answer)).required().max_len(10);
}

/// Acknowledgement returned for a stored submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub id: SubmissionId,
    pub received_at: Timestamp,
}
