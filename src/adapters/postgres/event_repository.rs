//! PostgreSQL implementation of EventRepository.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::domain::event::Event;
use crate::domain::foundation::{DomainError, ErrorCode, EventId};
use crate::ports::EventRepository;

use super::support::{db_error, decode_all, decode_doc, label};

#[derive(Clone)]
pub struct PostgresEventRepository {
    pool: PgPool,
}

impl PostgresEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn create(&self, event: &Event) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO events (id, kind, starts_at, doc, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(event.id.as_uuid())
        .bind(label(&event.details.kind))
        .bind(event.details.starts_at.map(|t| *t.as_datetime()))
        .bind(Json(event))
        .bind(event.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("insert event"))?;

        Ok(())
    }

    async fn update(&self, event: &Event) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE events SET kind = $2, starts_at = $3, doc = $4 WHERE id = $1",
        )
        .bind(event.id.as_uuid())
        .bind(label(&event.details.kind))
        .bind(event.details.starts_at.map(|t| *t.as_datetime()))
        .bind(Json(event))
        .execute(&self.pool)
        .await
        .map_err(db_error("update event"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::EventNotFound,
                format!("Event not found: {}", event.id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, DomainError> {
        let row = sqlx::query("SELECT doc FROM events WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch event"))?;

        row.as_ref().map(decode_doc).transpose()
    }

    async fn list(&self) -> Result<Vec<Event>, DomainError> {
        let rows = sqlx::query(
            "SELECT doc FROM events ORDER BY starts_at ASC NULLS LAST, created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list events"))?;

        decode_all(rows)
    }

    async fn delete(&self, id: &EventId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("delete event"))?;

        Ok(result.rows_affected() > 0)
    }
}
