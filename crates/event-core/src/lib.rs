//! # event-core
//!
//! Domain layer containing entities, identifiers, repository traits and the
//! domain error type. This crate has no dependency on infrastructure
//! (database, mail, web framework).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Event, EventImage, NewEvent, NewTicket, NewUser, PendingNotification, Recipient,
    RecipientGroup, ScheduledEvent, Ticket, TicketStatus, User,
};
pub use error::DomainError;
pub use traits::{
    EventRepository, NotificationRepository, RepoResult, ReservationRepository, UserRepository,
};
pub use value_objects::{EventId, IdParseError, UserId};
