//! Event repository port.

use async_trait::async_trait;

use crate::domain::event::Event;
use crate::domain::foundation::{DomainError, EventId};

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `EventNotFound` if the event doesn't exist
    async fn update(&self, event: &Event) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, DomainError>;

    /// All events, newest first. Audience filtering is the caller's job.
    async fn list(&self) -> Result<Vec<Event>, DomainError>;

    async fn delete(&self, id: &EventId) -> Result<bool, DomainError>;
}
