//! Ticket service
//!
//! Checking and redeeming tickets. The signature alone proves who the ticket
//! was issued to; the stored row decides whether the seat still exists and
//! whether the ticket was already used.

use chrono::{DateTime, Utc};
use event_common::TicketClaims;
use event_core::{DomainError, Event, Ticket, TicketStatus, UserId};
use tracing::{debug, info, instrument, warn};

use crate::dto::{EventSummary, TicketCheckResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Ticket service
pub struct TicketService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TicketService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Decode a ticket and report whether it admits its holder
    #[instrument(skip_all)]
    pub async fn check(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> ServiceResult<TicketCheckResponse> {
        let claims = self.decode(token, now).await?;
        let event = self.load_event(&claims).await?;
        let row = self.stored_ticket(token, &claims, now).await?;

        Ok(TicketCheckResponse {
            valid: row.as_ref().is_some_and(|t| t.is_usable(now)),
            status: row.map(|t| t.status),
            event: EventSummary::from(&event),
        })
    }

    /// Check a ticket in. Only the event owner may redeem; a ticket admits once.
    #[instrument(skip(self, token, now))]
    pub async fn redeem(
        &self,
        owner_id: UserId,
        token: &str,
        now: DateTime<Utc>,
    ) -> ServiceResult<TicketCheckResponse> {
        let claims = self.decode(token, now).await?;
        let event = self.load_event(&claims).await?;
        if !event.is_owner(owner_id) {
            return Err(DomainError::NotEventOwner(event.id).into());
        }

        let summary = EventSummary::from(&event);
        let Some(row) = self.stored_ticket(token, &claims, now).await? else {
            return Ok(TicketCheckResponse {
                valid: false,
                status: None,
                event: summary,
            });
        };

        if !row.is_usable(now) {
            debug!(status = %row.status, "Ticket not redeemable");
            return Ok(TicketCheckResponse {
                valid: false,
                status: Some(row.status),
                event: summary,
            });
        }

        let redeemed = self
            .ctx
            .reservation_repo()
            .set_ticket_status(token, TicketStatus::Active, TicketStatus::Used)
            .await?;

        if redeemed {
            info!(event_id = %event.id, user_id = %claims.user_id, "Ticket redeemed");
            return Ok(TicketCheckResponse {
                valid: true,
                status: Some(TicketStatus::Used),
                event: summary,
            });
        }

        // Lost a race with another redeem or a cancellation.
        let status = self
            .ctx
            .reservation_repo()
            .find_ticket(token)
            .await?
            .map(|t| t.status);

        Ok(TicketCheckResponse {
            valid: false,
            status,
            event: summary,
        })
    }

    /// Verify the token. A token rejected because it ran out also marks
    /// its still-active row as expired.
    async fn decode(&self, token: &str, now: DateTime<Utc>) -> ServiceResult<TicketClaims> {
        match self.ctx.ticket_codec().validate(token) {
            Ok(claims) => Ok(claims),
            Err(e) => {
                if let Some(row) = self.ctx.reservation_repo().find_ticket(token).await? {
                    self.expire_if_due(&row, now).await?;
                }
                Err(e.into())
            }
        }
    }

    async fn load_event(&self, claims: &TicketClaims) -> ServiceResult<Event> {
        Ok(self
            .ctx
            .event_repo()
            .find_by_id(claims.event_id)
            .await?
            .ok_or(DomainError::EventNotFound(claims.event_id))?)
    }

    /// The persisted row for a verified token, `None` once the reservation is gone
    async fn stored_ticket(
        &self,
        token: &str,
        claims: &TicketClaims,
        now: DateTime<Utc>,
    ) -> ServiceResult<Option<Ticket>> {
        let Some(mut row) = self.ctx.reservation_repo().find_ticket(token).await? else {
            return Ok(None);
        };

        if row.user_id != claims.user_id || row.event_id != claims.event_id {
            warn!("Ticket row does not match its token");
            return Ok(None);
        }

        if self.expire_if_due(&row, now).await? {
            row.status = TicketStatus::Expired;
        }
        Ok(Some(row))
    }

    async fn expire_if_due(&self, row: &Ticket, now: DateTime<Utc>) -> ServiceResult<bool> {
        if row.status != TicketStatus::Active || !row.is_expired(now) {
            return Ok(false);
        }
        let flipped = self
            .ctx
            .reservation_repo()
            .set_ticket_status(&row.token, TicketStatus::Active, TicketStatus::Expired)
            .await?;
        if flipped {
            debug!(event_id = %row.event_id, user_id = %row.user_id, "Ticket marked expired");
        }
        Ok(flipped)
    }
}
