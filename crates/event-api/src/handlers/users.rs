//! User handlers
//!
//! Endpoints for the caller's own account, reservations and tickets.

use axum::{extract::State, Json};
use event_service::{AuthService, EventResponse, TicketResponse, UserResponse, UserService};

use crate::extractors::AuthUser;
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Get current user
///
/// GET /users/@me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.current_user(auth.user_id).await?;
    Ok(Json(response))
}

/// Delete current user
///
/// DELETE /users/@me
pub async fn delete_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<NoContent> {
    let service = UserService::new(state.service_context());
    service.delete_account(auth.user_id).await?;
    Ok(NoContent)
}

/// Events the caller reserved
///
/// GET /users/@me/events
pub async fn get_my_events(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<EventResponse>>> {
    let service = UserService::new(state.service_context());
    let response = service.my_events(auth.user_id).await?;
    Ok(Json(response))
}

/// GET /users/@me/tickets
pub async fn get_my_tickets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<TicketResponse>>> {
    let service = UserService::new(state.service_context());
    let response = service.my_tickets(auth.user_id).await?;
    Ok(Json(response))
}
