//! Ticket database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for tickets table
#[derive(Debug, Clone, FromRow)]
pub struct TicketModel {
    pub token: String,
    pub event_id: i64,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
