//! PostgreSQL implementation of DocumentRepository.
//!
//! The PDF payload travels inside the JSONB document as base64.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::domain::document::Document;
use crate::domain::foundation::{DocumentId, DomainError, UserId};
use crate::ports::DocumentRepository;

use super::support::{db_error, decode_all, decode_doc};

#[derive(Clone)]
pub struct PostgresDocumentRepository {
    pool: PgPool,
}

impl PostgresDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn save(&self, document: &Document) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO documents (id, owner_id, doc_type, doc, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET doc = EXCLUDED.doc
            "#,
        )
        .bind(document.id().as_uuid())
        .bind(document.owner().as_uuid())
        .bind(document.doc_type().as_str())
        .bind(Json(document))
        .bind(document.created_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("insert document"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError> {
        let row = sqlx::query("SELECT doc FROM documents WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch document"))?;

        row.as_ref().map(decode_doc).transpose()
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Document>, DomainError> {
        let rows = sqlx::query(
            "SELECT doc FROM documents WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list documents"))?;

        decode_all(rows)
    }

    async fn delete(&self, id: &DocumentId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("delete document"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM documents")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("count documents"))?;

        Ok(count as u64)
    }
}
