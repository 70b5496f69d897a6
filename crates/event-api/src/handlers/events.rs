//! Event handlers
//!
//! Browsing is public; creating, closing and deleting need a session.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::Utc;
use event_service::{
    CreateEventRequest, EventPageResponse, EventResponse, EventService, ListEventsQuery,
};

use crate::extractors::{AuthUser, EventIdPath, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

/// Create an event
///
/// POST /events
pub async fn create_event(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateEventRequest>,
) -> ApiResult<Created<Json<EventResponse>>> {
    let service = EventService::new(state.service_context());
    let response = service.create(auth.user_id, request, Utc::now()).await?;
    Ok(Created(Json(response)))
}

/// List active events by day range
///
/// GET /events?from=YYYY-MM-DD&to=YYYY-MM-DD&page=N&limit=N
pub async fn list_events(
    State(state): State<AppState>,
    query: Result<Query<ListEventsQuery>, QueryRejection>,
) -> ApiResult<Json<EventPageResponse>> {
    let Query(query) = query.map_err(|e| ApiError::invalid_query(e.body_text()))?;

    let service = EventService::new(state.service_context());
    let response = service.list(query, Utc::now()).await?;
    Ok(Json(response))
}

/// GET /events/{event_id}
pub async fn get_event(
    State(state): State<AppState>,
    EventIdPath(event_id): EventIdPath,
) -> ApiResult<Json<EventResponse>> {
    let service = EventService::new(state.service_context());
    let response = service.get(event_id).await?;
    Ok(Json(response))
}

/// Stop accepting reservations
///
/// POST /events/{event_id}/close
pub async fn close_event(
    State(state): State<AppState>,
    auth: AuthUser,
    EventIdPath(event_id): EventIdPath,
) -> ApiResult<NoContent> {
    let service = EventService::new(state.service_context());
    service.close(auth.user_id, event_id).await?;
    Ok(NoContent)
}

/// DELETE /events/{event_id}
pub async fn delete_event(
    State(state): State<AppState>,
    auth: AuthUser,
    EventIdPath(event_id): EventIdPath,
) -> ApiResult<NoContent> {
    let service = EventService::new(state.service_context());
    service.delete(auth.user_id, event_id).await?;
    Ok(NoContent)
}
