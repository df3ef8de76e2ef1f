//! HTTP DTOs for the suggestion box.

use serde::Deserialize;

use crate::domain::suggestion::{Urgency, MAX_MESSAGE_LEN};

use super::super::validation::{FieldError, Validate, Validator};

pub const URGENCIES: [&str; 3] = ["baja", "media", "alta"];
pub const STATUSES: [&str; 4] = ["pendiente", "en-revision", "procesada", "archivada"];

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSuggestionRequest {
    pub category: Option<String>,
    #[serde(default)]
    pub message: String,
    pub urgency: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl SubmitSuggestionRequest {
    pub fn urgency(&self) -> Urgency {
        match self.urgency.as_deref() {
            Some("baja") => Urgency::Baja,
            Some("alta") => Urgency::Alta,
            _ => Urgency::Media,
        }
    }
}

impl Validate for SubmitSuggestionRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.field("message", Some(self.message.as_str()))
            .required()
            .max_len(MAX_MESSAGE_LEN);
        v.field("category", self.category.as_deref()).max_len(50);
        v.field("urgency", self.urgency.as_deref()).one_of(&URGENCIES);
        v.field("name", self.name.as_deref()).max_len(100);
        v.field("email", self.email.as_deref()).max_len(254).email();
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestionListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusRequest {
    pub status: String,
    pub admin_notes: Option<String>,
}

impl Validate for ChangeStatusRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.field("status", Some(self.status.as_str()))
            .required()
            .one_of(&STATUSES);
        v.field("adminNotes", self.admin_notes.as_deref()).max_len(2000);
        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(message: &str) -> SubmitSuggestionRequest {
        SubmitSuggestionRequest {
            category: None,
            message: message.into(),
            urgency: Some("alta".into()),
            is_anonymous: true,
            name: None,
            email: None,
        }
    }

    #[test]
    fn urgency_defaults_to_media() {
        let mut req = request("Más bancos en el patio");
        assert_eq!(req.urgency(), Urgency::Alta);
        req.urgency = None;
        assert_eq!(req.urgency(), Urgency::Media);
    }

    #[test]
    fn message_bounds_are_enforced() {
        assert!(request("   ").validate().is_err());
        assert!(request(&"x".repeat(MAX_MESSAGE_LEN + 1)).validate().is_err());
        assert!(request("Más bancos en el patio").validate().is_ok());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let req = ChangeStatusRequest {
            status: "resuelta".into(),
            admin_notes: None,
        };
        assert_eq!(req.validate().unwrap_err()[0].field, "status");
    }
}
