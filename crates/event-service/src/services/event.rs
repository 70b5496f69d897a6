//! Event service
//!
//! Creating, browsing, closing and deleting events. Images arrive base64
//! encoded inside the create request and are written to the object store
//! before the event row exists; they are removed again if the insert fails.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use event_core::{DomainError, Event, EventId, NewEvent, UserId};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::dto::{
    CreateEventRequest, EventPageResponse, EventResponse, ImageUpload, ListEventsQuery,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

const DEFAULT_PAGE_SIZE: u32 = 100;
const MAX_PAGE_SIZE: u32 = 100;
const DEFAULT_IMAGE_EXTENSION: &str = "jpg";

/// Event service
pub struct EventService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EventService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create an event owned by the caller
    #[instrument(skip(self, request), fields(owner_id = %owner_id, images = request.images.len()))]
    pub async fn create(
        &self,
        owner_id: UserId,
        request: CreateEventRequest,
        now: DateTime<Utc>,
    ) -> ServiceResult<EventResponse> {
        if request.starts_at <= now {
            return Err(ServiceError::validation("Event must start in the future"));
        }
        let settings = self.ctx.settings();
        if request.images.len() > settings.max_images {
            return Err(ServiceError::validation(format!(
                "At most {} images per event",
                settings.max_images
            )));
        }

        // Decode everything up front so a bad payload writes nothing.
        let mut decoded = Vec::with_capacity(request.images.len());
        for (index, upload) in request.images.iter().enumerate() {
            let bytes = decode_image(upload, index, settings.max_image_bytes)?;
            decoded.push((stored_name(upload), bytes));
        }

        let mut stored = Vec::with_capacity(decoded.len());
        for (name, bytes) in &decoded {
            if let Err(e) = self.ctx.object_store().put(name, bytes).await {
                self.remove_images(&stored).await;
                return Err(e.into());
            }
            stored.push(name.clone());
        }

        let new_event = NewEvent {
            owner_id,
            title: request.title,
            description: request.description,
            place: request.place,
            max_participants: request.max_participants,
            starts_at: request.starts_at,
            image_filenames: stored.clone(),
        };

        let event = match self.ctx.event_repo().create(&new_event).await {
            Ok(event) => event,
            Err(e) => {
                self.remove_images(&stored).await;
                return Err(e.into());
            }
        };

        info!(event_id = %event.id, "Event created");
        Ok(event_response(self.ctx, event).await)
    }

    /// Get one event with fresh image links
    #[instrument(skip(self))]
    pub async fn get(&self, event_id: EventId) -> ServiceResult<EventResponse> {
        let event = self
            .ctx
            .event_repo()
            .find_by_id(event_id)
            .await?
            .ok_or(DomainError::EventNotFound(event_id))?;

        Ok(event_response(self.ctx, event).await)
    }

    /// Active events starting within whole UTC days `[from, to]`.
    /// Both bounds default to the day of `now`.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        query: ListEventsQuery,
        now: DateTime<Utc>,
    ) -> ServiceResult<EventPageResponse> {
        let from = query.from.unwrap_or_else(|| now.date_naive());
        let to = query.to.unwrap_or(from);
        if to < from {
            return Err(ServiceError::validation("`to` must not be before `from`"));
        }

        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        let (events, pages) = self
            .ctx
            .event_repo()
            .list_upcoming(start_of(from), start_of(to) + Duration::days(1), page, limit)
            .await?;

        let mut responses = Vec::with_capacity(events.len());
        for event in events {
            responses.push(event_response(self.ctx, event).await);
        }

        Ok(EventPageResponse {
            page,
            pages,
            limit,
            events: responses,
        })
    }

    /// Stop accepting reservations
    #[instrument(skip(self))]
    pub async fn close(&self, owner_id: UserId, event_id: EventId) -> ServiceResult<()> {
        self.ctx.event_repo().close(owner_id, event_id).await?;
        info!(event_id = %event_id, "Event closed");
        Ok(())
    }

    /// Delete an event and its stored images
    #[instrument(skip(self))]
    pub async fn delete(&self, owner_id: UserId, event_id: EventId) -> ServiceResult<()> {
        let filenames = self.ctx.event_repo().delete(owner_id, event_id).await?;
        self.remove_images(&filenames).await;
        info!(event_id = %event_id, images = filenames.len(), "Event deleted");
        Ok(())
    }

    /// Best-effort removal; a leftover file is only logged
    async fn remove_images(&self, names: &[String]) {
        for name in names {
            if let Err(e) = self.ctx.object_store().delete(name).await {
                warn!(filename = %name, error = %e, "Failed to remove image");
            }
        }
    }
}

/// Build the API view of an event, resolving each image to a signed link.
/// Images whose file is gone are left out.
pub(super) async fn event_response(ctx: &ServiceContext, event: Event) -> EventResponse {
    let mut urls = Vec::with_capacity(event.images.len());
    for filename in event.image_filenames() {
        match ctx.object_store().resolve_url(filename).await {
            Ok(url) => urls.push(url),
            Err(e) => {
                warn!(event_id = %event.id, filename, error = %e, "Skipping unresolvable image");
            }
        }
    }
    EventResponse::with_image_urls(event, urls)
}

fn start_of(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Random object name keeping a sanitized extension of the upload
fn stored_name(upload: &ImageUpload) -> String {
    let extension = upload
        .filename
        .as_deref()
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| {
            (1..=5).contains(&ext.len()) && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or_else(|| DEFAULT_IMAGE_EXTENSION.to_string());

    format!("{}.{extension}", Uuid::new_v4().simple())
}

fn decode_image(upload: &ImageUpload, index: usize, max_bytes: usize) -> ServiceResult<Vec<u8>> {
    // Accept data URLs as sent by browsers.
    let payload = match upload.base64_data.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => upload.base64_data.as_str(),
    };

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| ServiceError::validation(format!("Image {index} is not valid base64: {e}")))?;

    if bytes.is_empty() {
        return Err(ServiceError::validation(format!("Image {index} is empty")));
    }
    if bytes.len() > max_bytes {
        return Err(ServiceError::validation(format!(
            "Image {index} exceeds {max_bytes} bytes"
        )));
    }

    debug!(index, size = bytes.len(), "Image decoded");
    Ok(bytes)
}
