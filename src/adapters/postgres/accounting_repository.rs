//! PostgreSQL implementations of the accounting repositories.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::domain::accounting::{FeePeriod, Invoice, InvoiceStatus, MembershipFee, Transaction};
use crate::domain::foundation::{
    DomainError, ErrorCode, FeeId, InvoiceId, TransactionId, UserId,
};
use crate::ports::{
    FeeFilter, InvoiceRepository, MembershipFeeRepository, TransactionFilter,
    TransactionRepository,
};

use super::support::{db_error, decode_all, decode_doc, is_unique_violation, label};

// ════════════════════════════════════════════════════════════════════════════
// Transactions
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn create(&self, transaction: &Transaction) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, kind, status, occurred_at, doc)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(transaction.id.as_uuid())
        .bind(label(&transaction.kind))
        .bind(label(&transaction.status))
        .bind(transaction.date.as_datetime())
        .bind(Json(transaction))
        .execute(&self.pool)
        .await
        .map_err(db_error("insert transaction"))?;

        Ok(())
    }

    async fn update(&self, transaction: &Transaction) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE transactions SET kind = $2, status = $3, occurred_at = $4, doc = $5 WHERE id = $1",
        )
        .bind(transaction.id.as_uuid())
        .bind(label(&transaction.kind))
        .bind(label(&transaction.status))
        .bind(transaction.date.as_datetime())
        .bind(Json(transaction))
        .execute(&self.pool)
        .await
        .map_err(db_error("update transaction"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::TransactionNotFound,
                format!("Transaction not found: {}", transaction.id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &TransactionId) -> Result<Option<Transaction>, DomainError> {
        let row = sqlx::query("SELECT doc FROM transactions WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch transaction"))?;

        row.as_ref().map(decode_doc).transpose()
    }

    async fn list(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT doc FROM transactions
            WHERE ($1::TEXT IS NULL OR kind = $1)
              AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY occurred_at DESC
            "#,
        )
        .bind(filter.kind.as_ref().map(label))
        .bind(filter.status.as_ref().map(label))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list transactions"))?;

        decode_all(rows)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Invoices
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PostgresInvoiceRepository {
    pool: PgPool,
}

impl PostgresInvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
    async fn create(&self, invoice: &Invoice) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO invoices (id, number, status, doc, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(invoice.id().as_uuid())
        .bind(invoice.number())
        .bind(label(&invoice.status()))
        .bind(Json(invoice))
        .bind(invoice.created_at().as_datetime())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(DomainError::validation(
                "number",
                format!("Invoice number already used: {}", invoice.number()),
            )),
            Err(e) => Err(db_error("insert invoice")(e)),
        }
    }

    async fn update(&self, invoice: &Invoice) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE invoices SET status = $2, doc = $3 WHERE id = $1")
            .bind(invoice.id().as_uuid())
            .bind(label(&invoice.status()))
            .bind(Json(invoice))
            .execute(&self.pool)
            .await
            .map_err(db_error("update invoice"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::InvoiceNotFound,
                format!("Invoice not found: {}", invoice.id()),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, DomainError> {
        let row = sqlx::query("SELECT doc FROM invoices WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch invoice"))?;

        row.as_ref().map(decode_doc).transpose()
    }

    async fn list(&self, status: Option<InvoiceStatus>) -> Result<Vec<Invoice>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT doc FROM invoices
            WHERE ($1::TEXT IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status.as_ref().map(label))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list invoices"))?;

        decode_all(rows)
    }

    async fn count_for_year(&self, year: i32) -> Result<u64, DomainError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM invoices WHERE EXTRACT(YEAR FROM created_at AT TIME ZONE 'UTC')::INTEGER = $1",
        )
        .bind(year)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("count invoices"))?;

        Ok(count as u64)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Membership fees
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PostgresMembershipFeeRepository {
    pool: PgPool,
}

impl PostgresMembershipFeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipFeeRepository for PostgresMembershipFeeRepository {
    async fn create(&self, fee: &MembershipFee) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO membership_fees (id, user_id, period_year, period_month, status, doc)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(fee.id.as_uuid())
        .bind(fee.user_id.as_uuid())
        .bind(fee.period.year)
        .bind(fee.period.month as i32)
        .bind(label(&fee.status))
        .bind(Json(fee))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(DomainError::new(
                ErrorCode::DuplicateFee,
                format!("Fee already exists for {} in {}", fee.user_id, fee.period),
            )),
            Err(e) => Err(db_error("insert membership fee")(e)),
        }
    }

    async fn update(&self, fee: &MembershipFee) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE membership_fees SET status = $2, doc = $3 WHERE id = $1")
            .bind(fee.id.as_uuid())
            .bind(label(&fee.status))
            .bind(Json(fee))
            .execute(&self.pool)
            .await
            .map_err(db_error("update membership fee"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::FeeNotFound,
                format!("Fee not found: {}", fee.id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &FeeId) -> Result<Option<MembershipFee>, DomainError> {
        let row = sqlx::query("SELECT doc FROM membership_fees WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch membership fee"))?;

        row.as_ref().map(decode_doc).transpose()
    }

    async fn find_for_period(
        &self,
        user_id: &UserId,
        period: FeePeriod,
    ) -> Result<Option<MembershipFee>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT doc FROM membership_fees
            WHERE user_id = $1 AND period_year = $2 AND period_month = $3
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(period.year)
        .bind(period.month as i32)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch membership fee for period"))?;

        row.as_ref().map(decode_doc).transpose()
    }

    async fn list(&self, filter: &FeeFilter) -> Result<Vec<MembershipFee>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT doc FROM membership_fees
            WHERE ($1::UUID IS NULL OR user_id = $1)
              AND ($2::INTEGER IS NULL OR period_year = $2)
              AND ($3::INTEGER IS NULL OR period_month = $3)
              AND ($4::TEXT IS NULL OR status = $4)
            ORDER BY period_year DESC, period_month DESC
            "#,
        )
        .bind(filter.user_id.map(|u| *u.as_uuid()))
        .bind(filter.year)
        .bind(filter.month.map(|m| m as i32))
        .bind(filter.status.as_ref().map(label))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list membership fees"))?;

        decode_all(rows)
    }
}
