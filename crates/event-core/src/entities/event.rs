//! Event entity - a scheduled gathering with a bounded number of seats

use chrono::{DateTime, Utc};

use crate::value_objects::{EventId, UserId};

/// Image attached to an event, stored by filename in the object store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventImage {
    pub filename: String,
    /// Display order within the event, starting at 0
    pub position: i32,
}

/// Event entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: EventId,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub place: String,
    pub participants: i32,
    pub max_participants: i32,
    pub starts_at: DateTime<Utc>,
    pub active: bool,
    /// Ordered by `position`
    pub images: Vec<EventImage>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Check if the given user created this event
    #[inline]
    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// Check if every seat is taken
    #[inline]
    pub fn is_full(&self) -> bool {
        self.participants >= self.max_participants
    }

    /// Number of seats still available
    pub fn seats_left(&self) -> i32 {
        (self.max_participants - self.participants).max(0)
    }

    /// Whether a new reservation could be accepted at `now`
    pub fn accepts_reservations(&self, now: DateTime<Utc>) -> bool {
        self.active && self.starts_at > now && !self.is_full()
    }

    /// Image filenames in display order
    pub fn image_filenames(&self) -> impl Iterator<Item = &str> {
        self.images.iter().map(|image| image.filename.as_str())
    }
}

/// Data needed to create an event
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub place: String,
    pub max_participants: i32,
    pub starts_at: DateTime<Utc>,
    /// Filenames already written to the object store, in display order
    pub image_filenames: Vec<String>,
}
