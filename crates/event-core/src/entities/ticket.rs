//! Ticket entity - the persisted side of a reservation credential

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::value_objects::{EventId, UserId};

/// Lifecycle of a persisted ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Active,
    /// Checked in by the event owner
    Used,
    /// Found past its expiry during validation
    Expired,
}

impl TicketStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Used => "used",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "used" => Ok(Self::Used),
            "expired" => Ok(Self::Expired),
            other => Err(format!("unknown ticket status: {other}")),
        }
    }
}

/// Ticket row, created together with its reservation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    /// Signed token string handed to the user
    pub token: String,
    pub event_id: EventId,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Active and not yet past expiry
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.status == TicketStatus::Active && !self.is_expired(now)
    }
}

/// Data for a reservation plus the ticket issued for it
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub token: String,
    pub event_id: EventId,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}
