//! User service
//!
//! Account-level operations for the authenticated caller.

use event_core::UserId;
use tracing::{info, instrument};

use crate::dto::{EventResponse, TicketResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::event::event_response;

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Delete the caller's account along with their seats and tickets
    #[instrument(skip(self))]
    pub async fn delete_account(&self, user_id: UserId) -> ServiceResult<()> {
        self.ctx.user_repo().delete(user_id).await?;
        info!(user_id = %user_id, "Account deleted");
        Ok(())
    }

    /// Events the caller holds a reservation for
    #[instrument(skip(self))]
    pub async fn my_events(&self, user_id: UserId) -> ServiceResult<Vec<EventResponse>> {
        let events = self.ctx.event_repo().list_by_participant(user_id).await?;

        let mut responses = Vec::with_capacity(events.len());
        for event in events {
            responses.push(event_response(self.ctx, event).await);
        }
        Ok(responses)
    }

    /// The caller's ticket rows, newest first
    #[instrument(skip(self))]
    pub async fn my_tickets(&self, user_id: UserId) -> ServiceResult<Vec<TicketResponse>> {
        let tickets = self.ctx.reservation_repo().list_tickets(user_id).await?;
        Ok(tickets.into_iter().map(TicketResponse::from).collect())
    }
}
