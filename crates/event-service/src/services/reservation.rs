//! Reservation service
//!
//! A reservation is taken together with the ticket that proves it; both are
//! written in the same store transaction.

use event_core::{EventId, NewTicket, UserId};
use tracing::{info, instrument};

use crate::dto::ReservationResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Reservation service
pub struct ReservationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReservationService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Take a seat and issue its ticket
    #[instrument(skip(self))]
    pub async fn reserve(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> ServiceResult<ReservationResponse> {
        let issued = self
            .ctx
            .ticket_codec()
            .generate(user_id, event_id, self.ctx.settings().ticket_ttl_hours)?;

        let ticket = self
            .ctx
            .reservation_repo()
            .add_reservation(&NewTicket {
                token: issued.token,
                event_id,
                user_id,
                expires_at: issued.expires_at,
            })
            .await?;

        info!(event_id = %event_id, user_id = %user_id, "Seat reserved");

        Ok(ReservationResponse {
            token: ticket.token,
            expires_at: ticket.expires_at,
        })
    }

    /// Give the seat back; the ticket and any pending reminder go with it
    #[instrument(skip(self))]
    pub async fn cancel(&self, user_id: UserId, event_id: EventId) -> ServiceResult<()> {
        self.ctx
            .reservation_repo()
            .remove_reservation(event_id, user_id)
            .await?;

        info!(event_id = %event_id, user_id = %user_id, "Reservation cancelled");
        Ok(())
    }
}
