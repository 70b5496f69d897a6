//! # event-api
//!
//! REST API server built with Axum. The binary also runs the reminder
//! scheduler next to the HTTP listener.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{build_state, create_app, create_app_state, create_scheduler, run, run_server};
pub use state::AppState;
