//! Event database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for events table
#[derive(Debug, Clone, FromRow)]
pub struct EventModel {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub place: String,
    pub participants: i32,
    pub max_participants: i32,
    pub starts_at: DateTime<Utc>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Database model for event_images table
#[derive(Debug, Clone, FromRow)]
pub struct EventImageModel {
    pub event_id: i64,
    pub filename: String,
    pub position: i32,
}
