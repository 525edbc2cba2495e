//! Content endpoints
//!
//! POST /api/content - create a record (201)
//! GET  /api/content - all records, newest first (404 when there are none)

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use super::fallback::not_found;
use crate::http::error::ApiError;
use crate::http::extractors::ContentPayload;
use crate::http::server::AppState;
use crate::models::{ContentBody, ContentRecord};

/// POST /api/content - create a new record
async fn create_content(
    State(state): State<Arc<AppState>>,
    ContentPayload(raw): ContentPayload,
) -> Result<(StatusCode, Json<ContentRecord>), ApiError> {
    let content = ContentBody::from_json(raw.as_ref())?;

    let record = state
        .store
        .insert(content)
        .await
        .map_err(|e| ApiError::database("adding content", e))?;

    tracing::info!(id = record.id, "Content created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/content - list every record, most recent first
async fn list_content(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ContentRecord>>, ApiError> {
    let records = state
        .store
        .list_newest_first()
        .await
        .map_err(|e| ApiError::database("fetching content", e))?;

    // An empty table is reported as 404, not as an empty array
    if records.is_empty() {
        return Err(ApiError::NoContent);
    }

    Ok(Json(records))
}

/// Content routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/content",
        get(list_content).post(create_content).fallback(not_found),
    )
}
