//! HTTP DTOs for courses and events as members see them.

use serde::Serialize;

use crate::domain::event::{Event, EventKind};
use crate::domain::foundation::{EventId, Timestamp, UserId};

/// A course from the caller's point of view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseView {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub location: Option<String>,
    pub hours: Option<u32>,
    pub capacity: Option<u32>,
    pub enrolled_count: usize,
    pub spots_left: Option<u32>,
    pub enrolled: bool,
}

impl CourseView {
    pub fn for_user(event: &Event, user_id: &UserId) -> Self {
        let enrolled_count = event.enrolled.len();
        Self {
            id: event.id,
            title: event.details.title.clone(),
            description: event.details.description.clone(),
            starts_at: event.details.starts_at,
            ends_at: event.details.ends_at,
            location: event.details.location.clone(),
            hours: event.details.hours,
            capacity: event.details.capacity,
            enrolled_count,
            spots_left: event
                .details
                .capacity
                .map(|c| c.saturating_sub(enrolled_count as u32)),
            enrolled: event.is_enrolled(user_id),
        }
    }
}

/// An event with the caller's read flag. Receipts of other members stay hidden.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub kind: EventKind,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub location: Option<String>,
    pub read: bool,
    pub created_at: Timestamp,
}

impl EventView {
    pub fn for_user(event: &Event, user_id: &UserId) -> Self {
        Self {
            id: event.id,
            title: event.details.title.clone(),
            description: event.details.description.clone(),
            kind: event.details.kind,
            starts_at: event.details.starts_at,
            ends_at: event.details.ends_at,
            location: event.details.location.clone(),
            read: event.is_read_by(user_id),
            created_at: event.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadAck {
    pub read: bool,
}
