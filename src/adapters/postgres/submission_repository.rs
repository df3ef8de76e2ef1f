//! PostgreSQL implementations of the public-form and unmatched-payment stores.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::domain::foundation::DomainError;
use crate::domain::payment::UnmatchedPayment;
use crate::domain::submission::{AffiliationRequest, ContactMessage};
use crate::ports::{SubmissionRepository, UnmatchedPaymentRepository};

use super::support::{db_error, decode_all};

#[derive(Clone)]
pub struct PostgresSubmissionRepository {
    pool: PgPool,
}

impl PostgresSubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionRepository for PostgresSubmissionRepository {
    async fn save_contact(&self, message: &ContactMessage) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO contact_messages (id, doc, created_at) VALUES ($1, $2, $3)")
            .bind(message.id.as_uuid())
            .bind(Json(message))
            .bind(message.created_at.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(db_error("insert contact message"))?;
        Ok(())
    }

    async fn list_contacts(&self) -> Result<Vec<ContactMessage>, DomainError> {
        let rows = sqlx::query("SELECT doc FROM contact_messages ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list contact messages"))?;
        decode_all(rows)
    }

    async fn save_affiliation(&self, request: &AffiliationRequest) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO affiliation_requests (id, doc, created_at) VALUES ($1, $2, $3)")
            .bind(request.id.as_uuid())
            .bind(Json(request))
            .bind(request.created_at.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(db_error("insert affiliation request"))?;
        Ok(())
    }

    async fn list_affiliations(&self) -> Result<Vec<AffiliationRequest>, DomainError> {
        let rows = sqlx::query("SELECT doc FROM affiliation_requests ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list affiliation requests"))?;
        decode_all(rows)
    }
}

#[derive(Clone)]
pub struct PostgresUnmatchedPaymentRepository {
    pool: PgPool,
}

impl PostgresUnmatchedPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnmatchedPaymentRepository for PostgresUnmatchedPaymentRepository {
    async fn record(&self, payment: &UnmatchedPayment) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO unmatched_payments (id, session_id, resolved, doc, received_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (session_id) DO NOTHING
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(&payment.session_id)
        .bind(payment.resolved)
        .bind(Json(payment))
        .bind(payment.received_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("record unmatched payment"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<UnmatchedPayment>, DomainError> {
        let rows = sqlx::query("SELECT doc FROM unmatched_payments ORDER BY received_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list unmatched payments"))?;
        decode_all(rows)
    }

    async fn count_unresolved(&self) -> Result<u64, DomainError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM unmatched_payments WHERE NOT resolved")
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("count unmatched payments"))?;
        Ok(count as u64)
    }
}
