//! PostgreSQL implementation of NotificationRepository

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use event_core::entities::{Event, RecipientGroup, ScheduledEvent};
use event_core::traits::{NotificationRepository, RepoResult};
use event_core::value_objects::{EventId, UserId};

use crate::mappers::{group_due_recipients, group_unscheduled_pairs};
use crate::models::{DueRecipientModel, UnscheduledPairModel};

use super::error::map_db_error;
use super::event::load_event;

/// PostgreSQL implementation of NotificationRepository
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `[start, end)` of a UTC calendar day
fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    #[instrument(skip(self))]
    async fn events_starting_on(&self, date: NaiveDate) -> RepoResult<Vec<ScheduledEvent>> {
        let (start, end) = day_bounds(date);

        let rows = sqlx::query_as::<_, UnscheduledPairModel>(
            r"
            SELECT e.id AS event_id, e.starts_at, r.user_id
            FROM events e
            JOIN reservations r ON r.event_id = e.id
            WHERE e.active
              AND e.starts_at >= $1 AND e.starts_at < $2
              AND NOT EXISTS (
                  SELECT 1 FROM pending_notifications p
                  WHERE p.event_id = r.event_id AND p.user_id = r.user_id
              )
            ORDER BY e.starts_at, e.id, r.user_id
            ",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(group_unscheduled_pairs(rows))
    }

    #[instrument(skip(self))]
    async fn insert_pending_if_absent(
        &self,
        event_id: EventId,
        user_id: UserId,
        scheduled_at: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO pending_notifications (event_id, user_id, scheduled_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (event_id, user_id) DO NOTHING
            ",
        )
        .bind(event_id.into_inner())
        .bind(user_id.into_inner())
        .bind(scheduled_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn select_due_unsent(
        &self,
        now: DateTime<Utc>,
        window: Duration,
        max_attempts: Option<u32>,
    ) -> RepoResult<Vec<RecipientGroup>> {
        let max_attempts = max_attempts.map(|n| i32::try_from(n).unwrap_or(i32::MAX));

        let rows = sqlx::query_as::<_, DueRecipientModel>(
            r"
            SELECT p.event_id, p.user_id, u.email
            FROM pending_notifications p
            JOIN users u ON u.id = p.user_id
            WHERE NOT p.sent
              AND p.scheduled_at BETWEEN $1 AND $2
              AND ($3::INTEGER IS NULL OR p.attempts < $3)
            ORDER BY p.scheduled_at, p.event_id, p.user_id
            ",
        )
        .bind(now - window)
        .bind(now + window)
        .bind(max_attempts)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(group_due_recipients(rows))
    }

    #[instrument(skip(self))]
    async fn count_exhausted(&self, max_attempts: u32) -> RepoResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM pending_notifications WHERE NOT sent AND attempts >= $1",
        )
        .bind(i32::try_from(max_attempts).unwrap_or(i32::MAX))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count.max(0) as u64)
    }

    #[instrument(skip(self))]
    async fn mark_sent(&self, event_id: EventId, user_id: UserId) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE pending_notifications SET sent = TRUE WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            // Reservation was cancelled while the mail was in flight.
            debug!("pending row vanished before it could be marked sent");
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn record_failure(&self, event_id: EventId, user_id: UserId) -> RepoResult<()> {
        sqlx::query(
            r"
            UPDATE pending_notifications
            SET attempts = attempts + 1
            WHERE event_id = $1 AND user_id = $2 AND NOT sent
            ",
        )
        .bind(event_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn purge_sent_before(&self, cutoff: DateTime<Utc>) -> RepoResult<u64> {
        let result =
            sqlx::query("DELETE FROM pending_notifications WHERE sent AND scheduled_at < $1")
                .bind(cutoff)
                .execute(&self.pool)
                .await
                .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn close_started_before(&self, cutoff: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query("UPDATE events SET active = FALSE WHERE active AND starts_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn event_for_message(&self, event_id: EventId) -> RepoResult<Option<Event>> {
        load_event(&self.pool, event_id).await
    }
}
