//! Response DTOs for API endpoints

use chrono::{DateTime, Utc};
use event_common::TokenPair;
use event_core::{EventId, TicketStatus, UserId};
use serde::Serialize;

// ============================================================================
// Auth Responses
// ============================================================================

/// Authentication response with tokens
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

impl AuthResponse {
    pub fn new(pair: TokenPair, user: UserResponse) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
            user,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub login: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Event Responses
// ============================================================================

/// Full event with fetchable image links
#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    pub id: EventId,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub place: String,
    pub participants: i32,
    pub max_participants: i32,
    pub seats_left: i32,
    pub starts_at: DateTime<Utc>,
    pub active: bool,
    /// Signed URLs in display order
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct EventPageResponse {
    pub page: u32,
    pub pages: u32,
    pub limit: u32,
    pub events: Vec<EventResponse>,
}

/// What a ticket check reveals about the event
#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    pub id: EventId,
    pub title: String,
    pub place: String,
    pub starts_at: DateTime<Utc>,
    pub active: bool,
}

// ============================================================================
// Reservation / Ticket Responses
// ============================================================================

/// Issued on a successful reservation
#[derive(Debug, Clone, Serialize)]
pub struct ReservationResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketResponse {
    pub token: String,
    pub event_id: EventId,
    pub status: TicketStatus,
    pub expires_at: DateTime<Utc>,
}

/// Outcome of checking or redeeming a ticket
#[derive(Debug, Clone, Serialize)]
pub struct TicketCheckResponse {
    /// The ticket admits its holder right now
    pub valid: bool,
    /// Stored status; absent when the reservation was cancelled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    pub event: EventSummary,
}

// ============================================================================
// Health Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub database: bool,
}

impl ReadinessResponse {
    pub fn ready(database: bool) -> Self {
        Self {
            status: if database { "ready" } else { "unavailable" },
            database,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_check_omits_missing_status() {
        let response = TicketCheckResponse {
            valid: false,
            status: None,
            event: EventSummary {
                id: EventId::new(3),
                title: "Meetup".to_string(),
                place: "Hall".to_string(),
                starts_at: Utc::now(),
                active: true,
            },
        };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["valid"], false);
        assert!(json.get("status").is_none());
        assert_eq!(json["event"]["id"], 3);
    }

    #[test]
    fn test_status_serialized_lowercase() {
        let response = TicketResponse {
            token: "t".to_string(),
            event_id: EventId::new(1),
            status: TicketStatus::Used,
            expires_at: Utc::now(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "used");
    }

    #[test]
    fn test_readiness() {
        assert_eq!(ReadinessResponse::ready(true).status, "ready");
        assert_eq!(ReadinessResponse::ready(false).status, "unavailable");
    }
}
