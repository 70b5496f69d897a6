//! Folding reminder join rows into per-event groups

use std::collections::HashMap;

use event_core::entities::{Recipient, RecipientGroup, ScheduledEvent};
use event_core::value_objects::{EventId, UserId};

use crate::models::{DueRecipientModel, UnscheduledPairModel};

/// Group (event, user) rows by event, keeping first-seen event order
pub fn group_unscheduled_pairs(rows: Vec<UnscheduledPairModel>) -> Vec<ScheduledEvent> {
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut events: Vec<ScheduledEvent> = Vec::new();

    for row in rows {
        let slot = *index.entry(row.event_id).or_insert_with(|| {
            events.push(ScheduledEvent {
                event_id: EventId::new(row.event_id),
                starts_at: row.starts_at,
                user_ids: Vec::new(),
            });
            events.len() - 1
        });
        events[slot].user_ids.push(UserId::new(row.user_id));
    }

    events
}

/// Group due recipients by event, keeping first-seen event order
pub fn group_due_recipients(rows: Vec<DueRecipientModel>) -> Vec<RecipientGroup> {
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut groups: Vec<RecipientGroup> = Vec::new();

    for row in rows {
        let slot = *index.entry(row.event_id).or_insert_with(|| {
            groups.push(RecipientGroup {
                event_id: EventId::new(row.event_id),
                recipients: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].recipients.push(Recipient {
            user_id: UserId::new(row.user_id),
            email: row.email,
        });
    }

    groups
}
