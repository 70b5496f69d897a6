//! Route handlers
//!
//! All HTTP request handlers organized by resource.

pub mod auth;
pub mod events;
pub mod health;
pub mod images;
pub mod reservations;
pub mod tickets;
pub mod users;
