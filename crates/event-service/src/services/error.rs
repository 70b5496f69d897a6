//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use event_common::{AppError, TicketError};
use event_core::DomainError;
use event_notify::StorageError;
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation
    Domain(DomainError),

    /// Application error (auth, tickets, external services)
    App(AppError),

    /// Resource not found
    NotFound { resource: &'static str, id: String },

    /// Caller may not perform the action
    PermissionDenied { reason: String },

    /// Validation error
    Validation(String),

    /// Conflict (e.g., duplicate resource)
    Conflict(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::PermissionDenied { reason } => write!(f, "Permission denied: {reason}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a not found error
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(reason: impl Into<String>) -> Self {
        Self::PermissionDenied {
            reason: reason.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => {
                if e.is_not_found() {
                    404
                } else if e.is_authorization() {
                    403
                } else if e.is_validation() {
                    400
                } else if e.is_conflict() {
                    409
                } else {
                    500
                }
            }
            Self::App(e) => e.status_code(),
            Self::NotFound { .. } => 404,
            Self::PermissionDenied { .. } => 403,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::NotFound { .. } => "NOT_FOUND",
            Self::PermissionDenied { .. } => "PERMISSION_DENIED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<TicketError> for ServiceError {
    fn from(err: TicketError) -> Self {
        Self::App(AppError::from(err))
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidName(name) => {
                Self::validation(format!("invalid image name: {name}"))
            }
            StorageError::NotFound(name) => Self::not_found("Image", name),
            StorageError::BadSignature => {
                Self::permission_denied("image link is invalid or expired")
            }
            other => Self::App(AppError::ExternalService(other.to_string())),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::NotFound { resource, id } => {
                AppError::NotFound(format!("{resource} {id}"))
            }
            ServiceError::PermissionDenied { .. } => AppError::InsufficientPermissions,
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::Conflict(msg) => AppError::Conflict(msg),
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use event_core::EventId;

    #[test]
    fn test_domain_mapping() {
        let err = ServiceError::from(DomainError::CapacityOrClosed(EventId::new(1)));
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "EVENT_FULL_OR_CLOSED");

        let err = ServiceError::from(DomainError::NotEventOwner(EventId::new(1)));
        assert_eq!(err.status_code(), 403);

        let err = ServiceError::from(DomainError::ReservationNotFound(EventId::new(1)));
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn test_ticket_error_is_bad_request() {
        let err = ServiceError::from(TicketError::Invalid);
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_TICKET");
    }

    #[test]
    fn test_storage_mapping() {
        assert_eq!(ServiceError::from(StorageError::BadSignature).status_code(), 403);
        assert_eq!(
            ServiceError::from(StorageError::NotFound("a.png".into())).status_code(),
            404
        );
        assert_eq!(
            ServiceError::from(StorageError::InvalidName("../x".into())).status_code(),
            400
        );
        assert_eq!(
            ServiceError::from(StorageError::Sign("bad key".into())).status_code(),
            500
        );
    }

    #[test]
    fn test_convert_to_app_error() {
        let app_err: AppError = ServiceError::not_found("Event", "456").into();
        assert_eq!(app_err.status_code(), 404);

        let app_err: AppError = ServiceError::permission_denied("nope").into();
        assert_eq!(app_err.status_code(), 403);
    }
}
