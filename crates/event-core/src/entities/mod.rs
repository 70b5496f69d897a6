//! Domain entities - core business objects

mod event;
mod notification;
mod ticket;
mod user;

pub use event::{Event, EventImage, NewEvent};
pub use notification::{PendingNotification, Recipient, RecipientGroup, ScheduledEvent};
pub use ticket::{NewTicket, Ticket, TicketStatus};
pub use user::{NewUser, User};
