//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{EventId, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Event not found: {0}")]
    EventNotFound(EventId),

    #[error("No reservation for event {0}")]
    ReservationNotFound(EventId),

    #[error("Ticket not found")]
    TicketNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not the owner of event {0}")]
    NotEventOwner(EventId),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Login already taken")]
    LoginTaken,

    #[error("Already reserved a seat for event {0}")]
    AlreadyReserved(EventId),

    #[error("Event {0} is full or closed")]
    CapacityOrClosed(EventId),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::EventNotFound(_) => "UNKNOWN_EVENT",
            Self::ReservationNotFound(_) => "UNKNOWN_RESERVATION",
            Self::TicketNotFound => "UNKNOWN_TICKET",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",

            // Authorization
            Self::NotEventOwner(_) => "NOT_EVENT_OWNER",

            // Conflict
            Self::LoginTaken => "LOGIN_TAKEN",
            Self::AlreadyReserved(_) => "ALREADY_RESERVED",
            Self::CapacityOrClosed(_) => "EVENT_FULL_OR_CLOSED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::EventNotFound(_) | Self::TicketNotFound
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotEventOwner(_))
    }

    /// Check if this is a conflict error
    ///
    /// Cancelling a reservation that does not exist is reported as a
    /// conflict, not a missing resource: the event is there, the seat is not.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::LoginTaken
                | Self::AlreadyReserved(_)
                | Self::CapacityOrClosed(_)
                | Self::ReservationNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::EventNotFound(EventId::new(1));
        assert_eq!(err.code(), "UNKNOWN_EVENT");

        let err = DomainError::CapacityOrClosed(EventId::new(1));
        assert_eq!(err.code(), "EVENT_FULL_OR_CLOSED");
    }

    #[test]
    fn test_classification() {
        assert!(DomainError::EventNotFound(EventId::new(1)).is_not_found());
        assert!(DomainError::UserNotFound(UserId::new(1)).is_not_found());
        assert!(!DomainError::ReservationNotFound(EventId::new(1)).is_not_found());
        assert!(DomainError::ReservationNotFound(EventId::new(1)).is_conflict());
        assert!(DomainError::AlreadyReserved(EventId::new(1)).is_conflict());
        assert!(DomainError::NotEventOwner(EventId::new(1)).is_authorization());
        assert!(!DomainError::LoginTaken.is_authorization());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::EventNotFound(EventId::new(123));
        assert_eq!(err.to_string(), "Event not found: 123");

        let err = DomainError::AlreadyReserved(EventId::new(5));
        assert_eq!(err.to_string(), "Already reserved a seat for event 5");
    }
}
