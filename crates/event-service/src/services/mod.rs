//! Business logic services
//!
//! Each service borrows the [`ServiceContext`] for the duration of a request
//! and talks to the store only through the repository traits.

pub mod auth;
pub mod context;
pub mod error;
pub mod event;
pub mod image;
pub mod reservation;
pub mod ticket;
pub mod user;

pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder, ServiceSettings};
pub use error::{ServiceError, ServiceResult};
pub use event::EventService;
pub use image::{ImageContent, ImageService};
pub use reservation::ReservationService;
pub use ticket::TicketService;
pub use user::UserService;
