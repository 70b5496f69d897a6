//! Route definitions
//!
//! All API routes organized by resource and mounted under /api/v1.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{auth, events, health, images, reservations, tickets, users};
use crate::state::AppState;

/// Create the main API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(health_routes())
        .nest("/api/v1", api_v1_routes())
}

/// Liveness and readiness probes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(event_routes())
        .merge(ticket_routes())
        .route("/images/:name", get(images::get_image))
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
}

/// Current-user routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/@me",
            get(users::get_current_user).delete(users::delete_current_user),
        )
        .route("/users/@me/events", get(users::get_my_events))
        .route("/users/@me/tickets", get(users::get_my_tickets))
}

/// Event and reservation routes
fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/:event_id",
            get(events::get_event).delete(events::delete_event),
        )
        .route("/events/:event_id/close", post(events::close_event))
        .route(
            "/events/:event_id/reservations",
            post(reservations::create_reservation).delete(reservations::cancel_reservation),
        )
}

/// Ticket routes
fn ticket_routes() -> Router<AppState> {
    Router::new()
        .route("/tickets/:token", get(tickets::check_ticket))
        .route("/tickets/:token/redeem", post(tickets::redeem_ticket))
}
