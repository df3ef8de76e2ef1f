//! Suggestion module - the public suggestion box.
//!
//! Submissions are anonymous-capable: when `is_anonymous` is set the
//! identity fields are never exposed through [`Suggestion::public_view`].

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, StateMachine, SuggestionId, Timestamp, ValidationError,
};

pub const MAX_MESSAGE_LEN: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Baja,
    #[default]
    Media,
    Alta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionStatus {
    #[default]
    Pendiente,
    EnRevision,
    Procesada,
    Archivada,
}

impl SuggestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionStatus::Pendiente => "pendiente",
            SuggestionStatus::EnRevision => "en-revision",
            SuggestionStatus::Procesada => "procesada",
            SuggestionStatus::Archivada => "archivada",
        }
    }

    /// Spanish label used in notification emails.
    pub fn label(&self) -> &'static str {
        match self {
            SuggestionStatus::Pendiente => "Pendiente",
            SuggestionStatus::EnRevision => "En revisión",
            SuggestionStatus::Procesada => "Procesada",
            SuggestionStatus::Archivada => "Archivada",
        }
    }
}

impl std::str::FromStr for SuggestionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(SuggestionStatus::Pendiente),
            "en-revision" => Ok(SuggestionStatus::EnRevision),
            "procesada" => Ok(SuggestionStatus::Procesada),
            "archivada" => Ok(SuggestionStatus::Archivada),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown status '{}'", other),
            )),
        }
    }
}

impl StateMachine for SuggestionStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use SuggestionStatus::*;
        match self {
            Pendiente => vec![EnRevision, Procesada, Archivada],
            EnRevision => vec![Procesada, Archivada],
            Procesada => vec![Archivada],
            Archivada => vec![],
        }
    }
}

/// Fields accepted from the public form.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSuggestion {
    pub category: Option<String>,
    pub message: String,
    pub urgency: Urgency,
    pub is_anonymous: bool,
    pub name: Option<String>,
    pub email: Option<String>,
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: SuggestionId,
    pub category: Option<String>,
    pub message: String,
    pub urgency: Urgency,
    pub status: SuggestionStatus,
    pub is_anonymous: bool,
    pub name: Option<String>,
    pub email: Option<String>,
    pub ip_address: Option<String>,
    pub admin_notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Suggestion {
    pub fn submit(input: NewSuggestion) -> Result<Self, ValidationError> {
        let message = input.message.trim().to_string();
        if message.is_empty() {
            return Err(ValidationError::empty_field("message"));
        }
        if message.chars().count() > MAX_MESSAGE_LEN {
            return Err(ValidationError::invalid_format(
                "message",
                format!("must be at most {} characters", MAX_MESSAGE_LEN),
            ));
        }
        let now = Timestamp::now();
        Ok(Self {
            id: SuggestionId::new(),
            category: input.category.filter(|c| !c.trim().is_empty()),
            message,
            urgency: input.urgency,
            status: SuggestionStatus::Pendiente,
            is_anonymous: input.is_anonymous,
            name: input.name.filter(|n| !n.trim().is_empty()),
            email: input.email.filter(|e| !e.trim().is_empty()),
            ip_address: input.ip_address,
            admin_notes: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn change_status(
        &mut self,
        target: SuggestionStatus,
        admin_notes: Option<String>,
    ) -> Result<(), DomainError> {
        self.status = self
            .status
            .transition_to(target)
            .map_err(|e| DomainError::new(ErrorCode::InvalidStateTransition, e.to_string()))?;
        if admin_notes.is_some() {
            self.admin_notes = admin_notes;
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Address to notify about status changes. None for anonymous submissions.
    pub fn notification_email(&self) -> Option<&str> {
        if self.is_anonymous {
            return None;
        }
        self.email.as_deref()
    }

    /// JSON representation returned by the API. Anonymous submissions never
    /// carry `name`, `email` or `ipAddress`.
    pub fn public_view(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
        if let Some(obj) = value.as_object_mut() {
            let identity = ["name", "email", "ipAddress"];
            if self.is_anonymous {
                for key in identity {
                    obj.remove(key);
                }
            } else {
                for key in identity {
                    if obj.get(key).map_or(false, |v| v.is_null()) {
                        obj.remove(key);
                    }
                }
            }
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(anonymous: bool) -> NewSuggestion {
        NewSuggestion {
            category: Some("instalaciones".into()),
            message: "Mejorar la iluminación del taller".into(),
            urgency: Urgency::Alta,
            is_anonymous: anonymous,
            name: Some("Marta".into()),
            email: Some("marta@example.com".into()),
            ip_address: Some("10.0.0.7".into()),
        }
    }

    #[test]
    fn anonymous_public_view_has_no_identity() {
        let suggestion = Suggestion::submit(input(true)).unwrap();
        let json = suggestion.public_view();

        assert!(json.get("name").is_none());
        assert!(json.get("email").is_none());
        assert!(json.get("ipAddress").is_none());
        assert_eq!(json["isAnonymous"], true);
        assert_eq!(json["status"], "pendiente");
    }

    #[test]
    fn named_public_view_keeps_identity() {
        let json = Suggestion::submit(input(false)).unwrap().public_view();
        assert_eq!(json["name"], "Marta");
        assert_eq!(json["email"], "marta@example.com");
    }

    #[test]
    fn notification_skipped_for_anonymous_or_missing_email() {
        assert!(Suggestion::submit(input(true)).unwrap().notification_email().is_none());

        let mut no_email = input(false);
        no_email.email = None;
        assert!(Suggestion::submit(no_email).unwrap().notification_email().is_none());

        assert_eq!(
            Suggestion::submit(input(false)).unwrap().notification_email(),
            Some("marta@example.com")
        );
    }

    #[test]
    fn status_flow() {
        let mut s = Suggestion::submit(input(false)).unwrap();
        s.change_status(SuggestionStatus::EnRevision, Some("Revisando".into()))
            .unwrap();
        s.change_status(SuggestionStatus::Procesada, None).unwrap();
        assert_eq!(s.admin_notes.as_deref(), Some("Revisando"));
        assert!(s.change_status(SuggestionStatus::Pendiente, None).is_err());
    }

    #[test]
    fn status_serializes_in_spanish_kebab_case() {
        assert_eq!(
            serde_json::to_value(SuggestionStatus::EnRevision).unwrap(),
            "en-revision"
        );
        assert_eq!("archivada".parse::<SuggestionStatus>().unwrap(), SuggestionStatus::Archivada);
    }

    #[test]
    fn rejects_blank_message() {
        let mut blank = input(false);
        blank.message = "   ".into();
        assert!(Suggestion::submit(blank).is_err());
    }
}
