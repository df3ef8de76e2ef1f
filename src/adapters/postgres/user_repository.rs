//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, Email, ErrorCode, Timestamp, UserId};
use crate::domain::user::User;
use crate::ports::{Page, UserFilter, UserRepository, UserStats};

use super::support::{db_error, decode_all, decode_doc, is_unique_violation};

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn email_taken(email: &Email) -> DomainError {
    DomainError::new(
        ErrorCode::EmailTaken,
        format!("Email already registered: {}", email),
    )
}

/// `%term%` for ILIKE with wildcard characters escaped.
fn search_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &User) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, email, name, role, status, doc, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(user.email.as_str())
        .bind(&user.profile.name)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .bind(Json(user))
        .bind(user.created_at.as_datetime())
        .bind(user.updated_at.as_datetime())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(email_taken(&user.email)),
            Err(e) => Err(db_error("insert user")(e)),
        }
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                email = $2,
                name = $3,
                role = $4,
                status = $5,
                doc = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(user.email.as_str())
        .bind(&user.profile.name)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .bind(Json(user))
        .bind(user.updated_at.as_datetime())
        .execute(&self.pool)
        .await;

        let result = match result {
            Ok(r) => r,
            Err(e) if is_unique_violation(&e) => return Err(email_taken(&user.email)),
            Err(e) => return Err(db_error("update user")(e)),
        };

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("User not found: {}", user.id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query("SELECT doc FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch user"))?;

        row.as_ref().map(decode_doc).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError> {
        let row = sqlx::query("SELECT doc FROM users WHERE email = $1")
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch user by email"))?;

        row.as_ref().map(decode_doc).transpose()
    }

    async fn list(&self, filter: &UserFilter) -> Result<Page<User>, DomainError> {
        let status = filter.status.map(|s| s.as_str());
        let role = filter.role.map(|r| r.as_str());
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| search_pattern(&s.to_lowercase()));

        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM users
            WHERE ($1::TEXT IS NULL OR status = $1)
              AND ($2::TEXT IS NULL OR role = $2)
              AND ($3::TEXT IS NULL OR email ILIKE $3 OR name ILIKE $3)
            "#,
        )
        .bind(status)
        .bind(role)
        .bind(search.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("count users"))?;

        let rows = sqlx::query(
            r#"
            SELECT doc FROM users
            WHERE ($1::TEXT IS NULL OR status = $1)
              AND ($2::TEXT IS NULL OR role = $2)
              AND ($3::TEXT IS NULL OR email ILIKE $3 OR name ILIKE $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(status)
        .bind(role)
        .bind(search.as_deref())
        .bind(filter.per_page as i64)
        .bind(filter.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list users"))?;

        Ok(Page {
            items: decode_all(rows)?,
            total: total as u64,
            page: filter.page.max(1),
            per_page: filter.per_page,
        })
    }

    async fn list_active(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query("SELECT doc FROM users WHERE status = 'active' ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list active users"))?;

        decode_all(rows)
    }

    async fn stats(&self, now: Timestamp) -> Result<UserStats, DomainError> {
        let (total, active, pending, inactive, admins, active_memberships): (
            i64,
            i64,
            i64,
            i64,
            i64,
            i64,
        ) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'active'),
                COUNT(*) FILTER (WHERE status = 'pending'),
                COUNT(*) FILTER (WHERE status = 'inactive'),
                COUNT(*) FILTER (WHERE role = 'admin'),
                COUNT(*) FILTER (
                    WHERE doc->'membership'->>'status' = 'active'
                      AND (doc->'membership'->>'expiryDate')::TIMESTAMPTZ > $1
                )
            FROM users
            "#,
        )
        .bind(now.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("compute user stats"))?;

        Ok(UserStats {
            total: total as u64,
            active: active as u64,
            pending: pending as u64,
            inactive: inactive as u64,
            admins: admins as u64,
            active_memberships: active_memberships as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_pattern_escapes_wildcards() {
        assert_eq!(search_pattern("ana"), "%ana%");
        assert_eq!(search_pattern("50%_off"), "%50\\%\\_off%");
    }
}
