//! Ticket handlers
//!
//! Checking is open to anyone holding the token; redeeming is for the
//! event owner.

use axum::{extract::State, Json};
use chrono::Utc;
use event_service::{TicketCheckResponse, TicketService};

use crate::extractors::{AuthUser, TicketPath};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /tickets/{token}
pub async fn check_ticket(
    State(state): State<AppState>,
    TicketPath(token): TicketPath,
) -> ApiResult<Json<TicketCheckResponse>> {
    let service = TicketService::new(state.service_context());
    let response = service.check(&token, Utc::now()).await?;
    Ok(Json(response))
}

/// POST /tickets/{token}/redeem
pub async fn redeem_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    TicketPath(token): TicketPath,
) -> ApiResult<Json<TicketCheckResponse>> {
    let service = TicketService::new(state.service_context());
    let response = service.redeem(auth.user_id, &token, Utc::now()).await?;
    Ok(Json(response))
}
