//! Reservation handlers

use axum::{extract::State, Json};
use event_service::{ReservationResponse, ReservationService};

use crate::extractors::{AuthUser, EventIdPath};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Reserve a seat and receive the ticket
///
/// POST /events/{event_id}/reservations
pub async fn create_reservation(
    State(state): State<AppState>,
    auth: AuthUser,
    EventIdPath(event_id): EventIdPath,
) -> ApiResult<Created<Json<ReservationResponse>>> {
    let service = ReservationService::new(state.service_context());
    let response = service.reserve(auth.user_id, event_id).await?;
    Ok(Created(Json(response)))
}

/// DELETE /events/{event_id}/reservations
pub async fn cancel_reservation(
    State(state): State<AppState>,
    auth: AuthUser,
    EventIdPath(event_id): EventIdPath,
) -> ApiResult<NoContent> {
    let service = ReservationService::new(state.service_context());
    service.cancel(auth.user_id, event_id).await?;
    Ok(NoContent)
}
