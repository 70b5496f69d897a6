//! Image handler
//!
//! Serves stored images to anyone holding an unexpired signed link.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use event_service::ImageService;
use serde::Deserialize;

use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignedLink {
    pub sig: String,
}

/// GET /images/{name}?sig=...
pub async fn get_image(
    State(state): State<AppState>,
    Path(name): Path<String>,
    query: Option<Query<SignedLink>>,
) -> ApiResult<impl IntoResponse> {
    let Some(Query(link)) = query else {
        return Err(ApiError::invalid_query("Missing `sig` parameter"));
    };

    let service = ImageService::new(state.service_context());
    let image = service.serve(&name, &link.sig).await?;

    Ok((
        [
            (header::CONTENT_TYPE, image.content_type),
            (header::CACHE_CONTROL, "private, max-age=300"),
        ],
        image.bytes,
    ))
}
