//! Model to entity mappers
//!
//! - `From<Model> for Entity` where the conversion cannot fail
//! - grouping helpers that fold flat join rows into aggregates

mod event;
mod notification;
mod ticket;
mod user;

pub use event::event_with_images;
pub use notification::{group_due_recipients, group_unscheduled_pairs};
pub use ticket::ticket_from_model;
