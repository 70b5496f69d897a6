//! PostgreSQL implementation of ReservationRepository
//!
//! A reservation, its seat on the event counter and its ticket row are
//! written and removed together inside one transaction.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use event_core::entities::{NewTicket, Ticket, TicketStatus};
use event_core::error::DomainError;
use event_core::traits::{RepoResult, ReservationRepository};
use event_core::value_objects::{EventId, UserId};

use crate::mappers::ticket_from_model;
use crate::models::TicketModel;

use super::error::{foreign_key_violation, map_db_error};

/// PostgreSQL implementation of ReservationRepository
#[derive(Clone)]
pub struct PgReservationRepository {
    pool: PgPool,
}

impl PgReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_reservation_insert_error(e: sqlx::Error, event_id: EventId, user_id: UserId) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return DomainError::AlreadyReserved(event_id);
        }
    }
    match foreign_key_violation(&e) {
        Some(constraint) if constraint.contains("user") => DomainError::UserNotFound(user_id),
        Some(_) => DomainError::EventNotFound(event_id),
        None => map_db_error(e),
    }
}

#[async_trait]
impl ReservationRepository for PgReservationRepository {
    #[instrument(skip(self, ticket), fields(event_id = %ticket.event_id, user_id = %ticket.user_id))]
    async fn add_reservation(&self, ticket: &NewTicket) -> RepoResult<Ticket> {
        let event_id = ticket.event_id;
        let user_id = ticket.user_id;

        // Dropping `tx` on any early return rolls everything back.
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("INSERT INTO reservations (event_id, user_id) VALUES ($1, $2)")
            .bind(event_id.into_inner())
            .bind(user_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_reservation_insert_error(e, event_id, user_id))?;

        let seated = sqlx::query(
            r"
            UPDATE events
            SET participants = participants + 1
            WHERE id = $1
              AND participants < max_participants
              AND active
              AND starts_at > NOW()
            ",
        )
        .bind(event_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if seated.rows_affected() == 0 {
            return Err(DomainError::CapacityOrClosed(event_id));
        }

        let model = sqlx::query_as::<_, TicketModel>(
            r"
            INSERT INTO tickets (token, event_id, user_id, expires_at, status)
            VALUES ($1, $2, $3, $4, 'active')
            RETURNING token, event_id, user_id, expires_at, status, created_at
            ",
        )
        .bind(&ticket.token)
        .bind(event_id.into_inner())
        .bind(user_id.into_inner())
        .bind(ticket.expires_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        ticket_from_model(model)
    }

    #[instrument(skip(self))]
    async fn remove_reservation(&self, event_id: EventId, user_id: UserId) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let removed = sqlx::query("DELETE FROM reservations WHERE event_id = $1 AND user_id = $2")
            .bind(event_id.into_inner())
            .bind(user_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if removed.rows_affected() == 0 {
            let exists =
                sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
                    .bind(event_id.into_inner())
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(map_db_error)?;

            return Err(if exists {
                DomainError::ReservationNotFound(event_id)
            } else {
                DomainError::EventNotFound(event_id)
            });
        }

        sqlx::query(
            "UPDATE events SET participants = participants - 1 WHERE id = $1 AND participants > 0",
        )
        .bind(event_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query("DELETE FROM tickets WHERE event_id = $1 AND user_id = $2")
            .bind(event_id.into_inner())
            .bind(user_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        sqlx::query("DELETE FROM pending_notifications WHERE event_id = $1 AND user_id = $2")
            .bind(event_id.into_inner())
            .bind(user_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn find_ticket(&self, token: &str) -> RepoResult<Option<Ticket>> {
        let model = sqlx::query_as::<_, TicketModel>(
            r"
            SELECT token, event_id, user_id, expires_at, status, created_at
            FROM tickets
            WHERE token = $1
            ",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        model.map(ticket_from_model).transpose()
    }

    #[instrument(skip(self))]
    async fn list_tickets(&self, user_id: UserId) -> RepoResult<Vec<Ticket>> {
        let models = sqlx::query_as::<_, TicketModel>(
            r"
            SELECT token, event_id, user_id, expires_at, status, created_at
            FROM tickets
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        models.into_iter().map(ticket_from_model).collect()
    }

    #[instrument(skip(self, token))]
    async fn set_ticket_status(
        &self,
        token: &str,
        expected: TicketStatus,
        status: TicketStatus,
    ) -> RepoResult<bool> {
        let result = sqlx::query("UPDATE tickets SET status = $3 WHERE token = $1 AND status = $2")
            .bind(token)
            .bind(expected.as_str())
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgReservationRepository>();
    }
}
