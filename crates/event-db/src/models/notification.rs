//! Row shapes for the reminder queries

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Reserved (event, user) pair on a scanned day with no pending row yet
#[derive(Debug, Clone, FromRow)]
pub struct UnscheduledPairModel {
    pub event_id: i64,
    pub starts_at: DateTime<Utc>,
    pub user_id: i64,
}

/// Unsent pending row joined to the user's address
#[derive(Debug, Clone, FromRow)]
pub struct DueRecipientModel {
    pub event_id: i64,
    pub user_id: i64,
    pub email: String,
}
