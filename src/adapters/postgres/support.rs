//! Shared helpers for the JSONB-backed repositories.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::Row;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Maps a sqlx error to a `DatabaseError` naming the failed action.
pub(super) fn db_error(action: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", action, e))
}

pub(super) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Decodes the aggregate stored in the `doc` column.
pub(super) fn decode_doc<T: DeserializeOwned>(row: &PgRow) -> Result<T, DomainError> {
    row.try_get::<Json<T>, _>("doc")
        .map(|Json(value)| value)
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to decode stored record: {}", e),
            )
        })
}

pub(super) fn decode_all<T: DeserializeOwned>(rows: Vec<PgRow>) -> Result<Vec<T>, DomainError> {
    rows.iter().map(decode_doc).collect()
}

/// Wire name of a unit enum, e.g. `"pending"`.
pub(super) fn label<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(other) => other.to_string(),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::accounting::FeeStatus;
    use crate::domain::suggestion::SuggestionStatus;

    #[test]
    fn label_uses_serde_names() {
        assert_eq!(label(&FeeStatus::Overdue), "overdue");
        assert_eq!(label(&SuggestionStatus::EnRevision), "en-revision");
    }

    #[test]
    fn db_error_names_action() {
        let err = db_error("insert user")(sqlx::Error::RowNotFound);
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.starts_with("Failed to insert user"));
    }
}
