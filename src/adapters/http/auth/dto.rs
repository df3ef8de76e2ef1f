//! HTTP DTOs for authentication endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

use super::super::user::UserView;
use super::super::validation::{password_policy, FieldError, Validate, Validator};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.field("email", Some(self.email.as_str())).required().email();
        v.field("password", Some(self.password.as_str())).required();
        v.finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.field("email", Some(self.email.as_str()))
            .required()
            .max_len(254)
            .email();
        password_policy(&mut v, "password", &self.password);
        v.field("name", Some(self.name.as_str()))
            .required()
            .min_len(2)
            .max_len(100);
        v.field("phone", self.phone.as_deref()).phone();
        v.field("department", self.department.as_deref()).max_len(100);
        v.finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl Validate for ChangePasswordRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.field("currentPassword", Some(self.current_password.as_str()))
            .required();
        password_policy(&mut v, "newPassword", &self.new_password);
        v.finish()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: Timestamp,
    pub user: UserView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_example_passes() {
        let req = RegisterRequest {
            email: "a@b.com".into(),
            password: "Abc123!".into(),
            name: "Ana".into(),
            phone: None,
            department: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn change_password_reports_both_fields() {
        let req = ChangePasswordRequest {
            current_password: "".into(),
            new_password: "short".into(),
        };
        let fields: Vec<_> = req
            .validate()
            .unwrap_err()
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["currentPassword", "newPassword"]);
    }
}
