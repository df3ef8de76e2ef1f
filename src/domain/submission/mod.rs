//! Submission module - public contact and affiliation forms.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Email, SubmissionId, Timestamp, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: SubmissionId,
    pub name: String,
    pub email: Email,
    pub subject: String,
    pub message: String,
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
}

impl ContactMessage {
    pub fn new(
        name: impl Into<String>,
        email: Email,
        subject: impl Into<String>,
        message: impl Into<String>,
        ip_address: Option<String>,
    ) -> Result<Self, ValidationError> {
        let name = required("name", name.into())?;
        let message = required("message", message.into())?;
        let subject = subject.into().trim().to_string();
        Ok(Self {
            id: SubmissionId::new(),
            name,
            email,
            subject: if subject.is_empty() {
                "Consulta general".to_string()
            } else {
                subject
            },
            message,
            ip_address,
            created_at: Timestamp::now(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffiliationStatus {
    #[default]
    Received,
    Contacted,
    Completed,
}

/// A request to join the union sent from the public site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliationRequest {
    pub id: SubmissionId,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub workplace: Option<String>,
    pub comments: Option<String>,
    pub status: AffiliationStatus,
    pub created_at: Timestamp,
}

/// Fields accepted from the affiliation form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AffiliationForm {
    pub name: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub workplace: Option<String>,
    pub comments: Option<String>,
}

impl AffiliationRequest {
    pub fn new(form: AffiliationForm, email: Email) -> Result<Self, ValidationError> {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Ok(Self {
            id: SubmissionId::new(),
            name: required("name", form.name)?,
            email,
            phone: non_blank(form.phone),
            department: non_blank(form.department),
            workplace: non_blank(form.workplace),
            comments: non_blank(form.comments),
            status: AffiliationStatus::Received,
            created_at: Timestamp::now(),
        })
    }
}

fn required(field: &str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> Email {
        Email::parse("pablo@example.com").unwrap()
    }

    #[test]
    fn contact_defaults_subject() {
        let msg = ContactMessage::new("Pablo", email(), "  ", "Hola", None).unwrap();
        assert_eq!(msg.subject, "Consulta general");
    }

    #[test]
    fn contact_requires_message() {
        assert!(ContactMessage::new("Pablo", email(), "Duda", " ", None).is_err());
    }

    #[test]
    fn affiliation_drops_blank_optionals() {
        let req = AffiliationRequest::new(
            AffiliationForm {
                name: " Pablo ".into(),
                phone: Some("".into()),
                department: Some("Mantenimiento".into()),
                ..Default::default()
            },
            email(),
        )
        .unwrap();
        assert_eq!(req.name, "Pablo");
        assert!(req.phone.is_none());
        assert_eq!(req.department.as_deref(), Some("Mantenimiento"));
        assert_eq!(req.status, AffiliationStatus::Received);
    }
}
