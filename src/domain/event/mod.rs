//! Event module - announcements, meetings, courses and reminders.
//!
//! Events are authored by admins and targeted at an audience. Members
//! acknowledge reading them; courses additionally keep an enrolment list.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, EventId, Role, Timestamp, UserId, ValidationError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Announcement,
    Meeting,
    Course,
    Reminder,
}

/// Who an event is shown to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "userIds", rename_all = "lowercase")]
pub enum Audience {
    #[default]
    All,
    Affiliates,
    Admins,
    Users(Vec<UserId>),
}

impl Audience {
    pub fn includes(&self, user_id: &UserId, role: Role) -> bool {
        match self {
            Audience::All => true,
            Audience::Affiliates => role == Role::Member,
            Audience::Admins => role == Role::Admin,
            Audience::Users(ids) => ids.contains(user_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadReceipt {
    pub user_id: UserId,
    pub read_at: Timestamp,
}

/// Editable fields of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub title: String,
    pub description: String,
    pub kind: EventKind,
    #[serde(default)]
    pub audience: Audience,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub location: Option<String>,
    /// Maximum enrolments; only meaningful for courses.
    pub capacity: Option<u32>,
    /// Training hours printed on course certificates.
    pub hours: Option<u32>,
}

impl EventDetails {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        if let (Some(start), Some(end)) = (self.starts_at, self.ends_at) {
            if end.is_before(&start) {
                return Err(ValidationError::invalid_format(
                    "endsAt",
                    "must not be before startsAt",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    #[serde(flatten)]
    pub details: EventDetails,
    pub created_by: UserId,
    #[serde(default)]
    pub read_by: Vec<ReadReceipt>,
    #[serde(default)]
    pub enrolled: Vec<UserId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Event {
    pub fn create(details: EventDetails, created_by: UserId) -> Result<Self, ValidationError> {
        details.validate()?;
        let now = Timestamp::now();
        Ok(Self {
            id: EventId::new(),
            details,
            created_by,
            read_by: Vec::new(),
            enrolled: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update(&mut self, details: EventDetails) -> Result<(), ValidationError> {
        details.validate()?;
        self.details = details;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn is_course(&self) -> bool {
        self.details.kind == EventKind::Course
    }

    pub fn is_visible_to(&self, user_id: &UserId, role: Role) -> bool {
        role.is_admin() || self.details.audience.includes(user_id, role)
    }

    pub fn is_read_by(&self, user_id: &UserId) -> bool {
        self.read_by.iter().any(|r| &r.user_id == user_id)
    }

    /// Records a read acknowledgement. Returns false if already recorded.
    pub fn mark_read(&mut self, user_id: UserId, now: Timestamp) -> bool {
        if self.is_read_by(&user_id) {
            return false;
        }
        self.read_by.push(ReadReceipt {
            user_id,
            read_at: now,
        });
        true
    }

    pub fn is_enrolled(&self, user_id: &UserId) -> bool {
        self.enrolled.contains(user_id)
    }

    pub fn enroll(&mut self, user_id: UserId) -> Result<(), DomainError> {
        if !self.is_course() {
            return Err(DomainError::validation("id", "Only courses accept enrolments"));
        }
        if self.is_enrolled(&user_id) {
            return Err(DomainError::new(
                ErrorCode::AlreadyEnrolled,
                "Already enrolled in this course",
            ));
        }
        if let Some(capacity) = self.details.capacity {
            if self.enrolled.len() >= capacity as usize {
                return Err(DomainError::new(
                    ErrorCode::InvalidStateTransition,
                    "Course is full",
                ));
            }
        }
        self.enrolled.push(user_id);
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(kind: EventKind, audience: Audience) -> EventDetails {
        EventDetails {
            title: "Asamblea general".to_string(),
            description: "Orden del día".to_string(),
            kind,
            audience,
            starts_at: None,
            ends_at: None,
            location: None,
            capacity: None,
            hours: None,
        }
    }

    #[test]
    fn audience_targets_roles_and_lists() {
        let member = UserId::new();
        let other = UserId::new();

        assert!(Audience::All.includes(&member, Role::Member));
        assert!(Audience::Affiliates.includes(&member, Role::Member));
        assert!(!Audience::Admins.includes(&member, Role::Member));
        assert!(Audience::Users(vec![member]).includes(&member, Role::Member));
        assert!(!Audience::Users(vec![member]).includes(&other, Role::Member));
    }

    #[test]
    fn admins_see_everything() {
        let event = Event::create(
            details(EventKind::Meeting, Audience::Users(vec![])),
            UserId::new(),
        )
        .unwrap();
        assert!(event.is_visible_to(&UserId::new(), Role::Admin));
        assert!(!event.is_visible_to(&UserId::new(), Role::Member));
    }

    #[test]
    fn mark_read_is_idempotent() {
        let mut event =
            Event::create(details(EventKind::Announcement, Audience::All), UserId::new()).unwrap();
        let reader = UserId::new();

        assert!(event.mark_read(reader, Timestamp::now()));
        assert!(!event.mark_read(reader, Timestamp::now()));
        assert_eq!(event.read_by.len(), 1);
    }

    #[test]
    fn enroll_respects_kind_duplicates_and_capacity() {
        let mut meeting =
            Event::create(details(EventKind::Meeting, Audience::All), UserId::new()).unwrap();
        assert!(meeting.enroll(UserId::new()).is_err());

        let mut course_details = details(EventKind::Course, Audience::All);
        course_details.capacity = Some(1);
        let mut course = Event::create(course_details, UserId::new()).unwrap();

        let first = UserId::new();
        course.enroll(first).unwrap();
        assert_eq!(
            course.enroll(first).unwrap_err().code,
            ErrorCode::AlreadyEnrolled
        );
        assert!(course.enroll(UserId::new()).is_err());
    }

    #[test]
    fn rejects_end_before_start() {
        let mut d = details(EventKind::Meeting, Audience::All);
        let now = Timestamp::now();
        d.starts_at = Some(now);
        d.ends_at = Some(now.add_days(-1));
        assert!(Event::create(d, UserId::new()).is_err());
    }

    #[test]
    fn audience_serializes_with_type_tag() {
        let json = serde_json::to_value(Audience::Affiliates).unwrap();
        assert_eq!(json, serde_json::json!({"type": "affiliates"}));
    }
}
