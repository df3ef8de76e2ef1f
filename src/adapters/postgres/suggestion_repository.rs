//! PostgreSQL implementation of SuggestionRepository.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, SuggestionId};
use crate::domain::suggestion::{Suggestion, SuggestionStatus};
use crate::ports::SuggestionRepository;

use super::support::{db_error, decode_all, decode_doc};

#[derive(Clone)]
pub struct PostgresSuggestionRepository {
    pool: PgPool,
}

impl PostgresSuggestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SuggestionRepository for PostgresSuggestionRepository {
    async fn create(&self, suggestion: &Suggestion) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO suggestions (id, status, doc, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(suggestion.id.as_uuid())
        .bind(suggestion.status.as_str())
        .bind(Json(suggestion))
        .bind(suggestion.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("insert suggestion"))?;

        Ok(())
    }

    async fn update(&self, suggestion: &Suggestion) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE suggestions SET status = $2, doc = $3 WHERE id = $1")
            .bind(suggestion.id.as_uuid())
            .bind(suggestion.status.as_str())
            .bind(Json(suggestion))
            .execute(&self.pool)
            .await
            .map_err(db_error("update suggestion"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SuggestionNotFound,
                format!("Suggestion not found: {}", suggestion.id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &SuggestionId) -> Result<Option<Suggestion>, DomainError> {
        let row = sqlx::query("SELECT doc FROM suggestions WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch suggestion"))?;

        row.as_ref().map(decode_doc).transpose()
    }

    async fn list(&self, status: Option<SuggestionStatus>) -> Result<Vec<Suggestion>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT doc FROM suggestions
            WHERE ($1::TEXT IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list suggestions"))?;

        decode_all(rows)
    }

    async fn count_by_status(&self, status: SuggestionStatus) -> Result<u64, DomainError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM suggestions WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("count suggestions"))?;

        Ok(count as u64)
    }
}
