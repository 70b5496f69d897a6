//! Error handling utilities for repositories

use event_core::error::DomainError;
use event_core::value_objects::EventId;
use sqlx::{Error as SqlxError, PgPool};

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    map_db_error(e)
}

/// Name of the violated foreign key, if that is what failed
pub fn foreign_key_violation(e: &SqlxError) -> Option<String> {
    let db_err = e.as_database_error()?;
    if db_err.is_foreign_key_violation() {
        Some(db_err.constraint().unwrap_or_default().to_string())
    } else {
        None
    }
}

/// Tell a missing event from one owned by someone else.
/// Used after an owner-scoped statement touched no rows.
pub async fn ownership_error(pool: &PgPool, event_id: EventId) -> DomainError {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
        .bind(event_id.into_inner())
        .fetch_one(pool)
        .await;

    match exists {
        Ok(true) => DomainError::NotEventOwner(event_id),
        Ok(false) => DomainError::EventNotFound(event_id),
        Err(e) => map_db_error(e),
    }
}
