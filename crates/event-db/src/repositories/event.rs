//! PostgreSQL implementation of EventRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use event_core::entities::{Event, NewEvent};
use event_core::error::DomainError;
use event_core::traits::{EventRepository, RepoResult};
use event_core::value_objects::{EventId, UserId};

use crate::mappers::event_with_images;
use crate::models::{EventImageModel, EventModel};

use super::error::{map_db_error, map_unique_violation, ownership_error};

const EVENT_COLUMNS: &str = "id, owner_id, title, description, place, participants, \
                             max_participants, starts_at, active, created_at";

const MAX_PAGE_SIZE: u32 = 100;

/// PostgreSQL implementation of EventRepository
#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Load one event with its images
pub(super) async fn load_event(pool: &PgPool, id: EventId) -> RepoResult<Option<Event>> {
    let model = sqlx::query_as::<_, EventModel>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
    ))
    .bind(id.into_inner())
    .fetch_optional(pool)
    .await
    .map_err(map_db_error)?;

    match model {
        Some(model) => Ok(attach_images(pool, vec![model]).await?.pop()),
        None => Ok(None),
    }
}

/// Fetch the images of all given events in one query and assemble entities
async fn attach_images(pool: &PgPool, models: Vec<EventModel>) -> RepoResult<Vec<Event>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
    let images = sqlx::query_as::<_, EventImageModel>(
        r"
        SELECT event_id, filename, position
        FROM event_images
        WHERE event_id = ANY($1)
        ORDER BY event_id, position
        ",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await
    .map_err(map_db_error)?;

    Ok(models
        .into_iter()
        .map(|model| {
            let own: Vec<EventImageModel> = images
                .iter()
                .filter(|image| image.event_id == model.id)
                .cloned()
                .collect();
            event_with_images(model, own)
        })
        .collect())
}

fn page_count(total: i64, limit: u32) -> u32 {
    let limit = i64::from(limit.max(1));
    ((total + limit - 1) / limit) as u32
}

#[async_trait]
impl EventRepository for PgEventRepository {
    #[instrument(skip(self, event), fields(owner_id = %event.owner_id, title = %event.title))]
    async fn create(&self, event: &NewEvent) -> RepoResult<Event> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let model = sqlx::query_as::<_, EventModel>(&format!(
            r"
            INSERT INTO events (owner_id, title, description, place, max_participants, starts_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {EVENT_COLUMNS}
            "
        ))
        .bind(event.owner_id.into_inner())
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.place)
        .bind(event.max_participants)
        .bind(event.starts_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let mut images = Vec::with_capacity(event.image_filenames.len());
        for (position, filename) in event.image_filenames.iter().enumerate() {
            let image = sqlx::query_as::<_, EventImageModel>(
                r"
                INSERT INTO event_images (event_id, filename, position)
                VALUES ($1, $2, $3)
                RETURNING event_id, filename, position
                ",
            )
            .bind(model.id)
            .bind(filename)
            .bind(position as i32)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                map_unique_violation(e, || {
                    DomainError::ValidationError(format!("duplicate image name: {filename}"))
                })
            })?;
            images.push(image);
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(event_with_images(model, images))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: EventId) -> RepoResult<Option<Event>> {
        load_event(&self.pool, id).await
    }

    #[instrument(skip(self))]
    async fn list_upcoming(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        page: u32,
        limit: u32,
    ) -> RepoResult<(Vec<Event>, u32)> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let page = page.max(1);

        let total = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM events
            WHERE active AND starts_at >= $1 AND starts_at < $2
            ",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        let models = sqlx::query_as::<_, EventModel>(&format!(
            r"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE active AND starts_at >= $1 AND starts_at < $2
            ORDER BY starts_at, id
            LIMIT $3 OFFSET $4
            "
        ))
        .bind(from)
        .bind(to)
        .bind(i64::from(limit))
        .bind(i64::from(page - 1) * i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let events = attach_images(&self.pool, models).await?;
        Ok((events, page_count(total, limit)))
    }

    #[instrument(skip(self))]
    async fn list_by_participant(&self, user_id: UserId) -> RepoResult<Vec<Event>> {
        let models = sqlx::query_as::<_, EventModel>(
            r"
            SELECT e.id, e.owner_id, e.title, e.description, e.place, e.participants,
                   e.max_participants, e.starts_at, e.active, e.created_at
            FROM events e
            JOIN reservations r ON r.event_id = e.id
            WHERE r.user_id = $1
            ORDER BY e.starts_at, e.id
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        attach_images(&self.pool, models).await
    }

    #[instrument(skip(self))]
    async fn close(&self, owner_id: UserId, event_id: EventId) -> RepoResult<()> {
        let result = sqlx::query("UPDATE events SET active = FALSE WHERE id = $1 AND owner_id = $2")
            .bind(event_id.into_inner())
            .bind(owner_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(ownership_error(&self.pool, event_id).await);
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, owner_id: UserId, event_id: EventId) -> RepoResult<Vec<String>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let owner =
            sqlx::query_scalar::<_, i64>("SELECT owner_id FROM events WHERE id = $1 FOR UPDATE")
                .bind(event_id.into_inner())
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_db_error)?;

        match owner {
            None => return Err(DomainError::EventNotFound(event_id)),
            Some(owner) if owner != owner_id.into_inner() => {
                return Err(DomainError::NotEventOwner(event_id))
            }
            Some(_) => {}
        }

        let filenames = sqlx::query_scalar::<_, String>(
            "SELECT filename FROM event_images WHERE event_id = $1 ORDER BY position",
        )
        .bind(event_id.into_inner())
        .fetch_all(&mut *tx)
        .await
        .map_err(map_db_error)?;

        // Images, reservations, tickets and pending reminders cascade.
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(event_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(filenames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(5, 0), 5);
    }

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgEventRepository>();
    }
}
