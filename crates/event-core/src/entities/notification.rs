//! Notification bookkeeping - which users must be reminded about which events

use chrono::{DateTime, Utc};

use crate::value_objects::{EventId, UserId};

/// One reminder row, unique per (event, user)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNotification {
    pub event_id: EventId,
    pub user_id: UserId,
    /// Start time of the event the reminder is for
    pub scheduled_at: DateTime<Utc>,
    pub sent: bool,
    /// Failed delivery attempts so far
    pub attempts: i32,
}

/// Event starting on a scanned day together with the users that still
/// need a pending row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledEvent {
    pub event_id: EventId,
    pub starts_at: DateTime<Utc>,
    pub user_ids: Vec<UserId>,
}

/// Mail recipient resolved from a pending row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub user_id: UserId,
    pub email: String,
}

/// Due reminders of one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientGroup {
    pub event_id: EventId,
    pub recipients: Vec<Recipient>,
}
