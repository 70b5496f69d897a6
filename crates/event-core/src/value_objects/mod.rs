//! Value objects - immutable types that represent domain concepts

mod ids;

pub use ids::{EventId, IdParseError, UserId};
