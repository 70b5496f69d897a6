//! Path parameter extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use event_core::EventId;

use crate::response::ApiError;

/// `:event_id` parsed into a positive [`EventId`]
#[derive(Debug, Clone, Copy)]
pub struct EventIdPath(pub EventId);

#[async_trait]
impl<S> FromRequestParts<S> for EventIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        raw.parse()
            .map(EventIdPath)
            .map_err(|_| ApiError::invalid_path("Invalid event_id format"))
    }
}

/// `:token` of a ticket, passed through as-is
#[derive(Debug, Clone)]
pub struct TicketPath(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for TicketPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(token) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        if token.is_empty() {
            return Err(ApiError::invalid_path("Ticket token is empty"));
        }
        Ok(TicketPath(token))
    }
}
