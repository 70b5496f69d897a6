//! Error types for the reminder pipeline

use event_core::{DomainError, EventId};
use thiserror::Error;

/// Mail relay errors
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Cannot connect to mail relay: {0}")]
    Connect(String),

    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Cannot build message: {0}")]
    Build(String),

    #[error("Delivery failed: {0}")]
    Send(String),
}

/// Object store errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid object name: {0}")]
    InvalidName(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid or expired signature")]
    BadSignature,

    #[error("Cannot sign URL: {0}")]
    Sign(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to build the message for one event
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Event {0} no longer exists")]
    EventGone(EventId),

    #[error("Cannot resolve image {filename}: {source}")]
    Image {
        filename: String,
        #[source]
        source: StorageError,
    },

    #[error(transparent)]
    Store(#[from] DomainError),
}

/// Scheduler tick errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error(transparent)]
    Store(#[from] DomainError),

    #[error("Store call timed out: {0}")]
    Timeout(&'static str),

    #[error("Mail relay unavailable, tick skipped")]
    MailUnavailable,
}

impl SchedulerError {
    /// Whether the next tick may succeed without intervention
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::MailUnavailable => true,
            Self::Store(e) => matches!(e, DomainError::DatabaseError(_)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(SchedulerError::Timeout("mark_sent").is_transient());
        assert!(SchedulerError::MailUnavailable.is_transient());
        assert!(SchedulerError::Store(DomainError::DatabaseError("gone".into())).is_transient());
        assert!(!SchedulerError::Store(DomainError::InternalError("bug".into())).is_transient());
    }

    #[test]
    fn test_compose_error_display() {
        let err = ComposeError::Image {
            filename: "a.png".to_string(),
            source: StorageError::NotFound("a.png".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Cannot resolve image a.png: Object not found: a.png"
        );
    }
}
