//! Ticket model -> entity mapper

use event_core::entities::{Ticket, TicketStatus};
use event_core::error::DomainError;
use event_core::value_objects::{EventId, UserId};

use crate::models::TicketModel;

/// Convert a ticket row, rejecting an unknown status value
pub fn ticket_from_model(model: TicketModel) -> Result<Ticket, DomainError> {
    let status: TicketStatus = model
        .status
        .parse()
        .map_err(DomainError::DatabaseError)?;

    Ok(Ticket {
        token: model.token,
        event_id: EventId::new(model.event_id),
        user_id: UserId::new(model.user_id),
        expires_at: model.expires_at,
        status,
        created_at: model.created_at,
    })
}
