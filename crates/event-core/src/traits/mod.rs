//! Repository traits (ports)

mod repositories;

pub use repositories::{
    EventRepository, NotificationRepository, RepoResult, ReservationRepository, UserRepository,
};
