//! Per-tick outcomes

use std::fmt;

use event_core::{EventId, UserId};

/// Result of one scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Events found on the target day that had unscheduled participants
    pub events: usize,
    /// Pending rows actually created
    pub inserted: usize,
    /// Sent rows removed
    pub purged: u64,
    /// Events deactivated because they have started
    pub closed: u64,
}

/// Something that went wrong for one event or one recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchFailure {
    /// The message for the whole event could not be built
    Compose { event_id: EventId, reason: String },
    /// One recipient could not be mailed or marked
    Delivery {
        event_id: EventId,
        user_id: UserId,
        reason: String,
    },
}

impl DispatchFailure {
    pub fn event_id(&self) -> EventId {
        match self {
            Self::Compose { event_id, .. } | Self::Delivery { event_id, .. } => *event_id,
        }
    }
}

impl fmt::Display for DispatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compose { event_id, reason } => {
                write!(f, "event {event_id}: cannot compose reminder: {reason}")
            }
            Self::Delivery {
                event_id,
                user_id,
                reason,
            } => write!(f, "event {event_id}, user {user_id}: {reason}"),
        }
    }
}

/// Result of one dispatch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Events that had due reminders
    pub events: usize,
    /// Recipients mailed and marked sent
    pub delivered: usize,
    pub failures: Vec<DispatchFailure>,
}

impl DispatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
