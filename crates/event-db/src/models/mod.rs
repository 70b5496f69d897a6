//! Database models - SQLx-compatible structs for PostgreSQL tables

mod event;
mod notification;
mod ticket;
mod user;

pub use event::{EventImageModel, EventModel};
pub use notification::{DueRecipientModel, UnscheduledPairModel};
pub use ticket::TicketModel;
pub use user::UserModel;
