//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in event-core.

mod error;
mod event;
mod notification;
mod reservation;
mod user;

pub use event::PgEventRepository;
pub use notification::PgNotificationRepository;
pub use reservation::PgReservationRepository;
pub use user::PgUserRepository;
