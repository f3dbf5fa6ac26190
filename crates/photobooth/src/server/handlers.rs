//! HTTP request handlers for API endpoints

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use photobooth_core::{PhotoSubmission, Quality};
use uuid::Uuid;

use super::error::ApiError;
use super::types::{CreatePhotoRequest, HealthResponse, PhotoQuery, StatusResponse};
use super::AppState;

/// Queue a photo for processing. Success means queued, not stored.
pub async fn create_photo(
    State(state): State<AppState>,
    Json(request): Json<CreatePhotoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.data.trim().is_empty() {
        return Err(ApiError::bad_request("data is required"));
    }

    state
        .publisher
        .submit(PhotoSubmission::new(request.data))
        .await?;

    Ok(Json(StatusResponse::ok()))
}

/// Return one rendition of a photo.
pub async fn get_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PhotoQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let quality = query.quality.unwrap_or_default();
    if Quality::parse(&quality).is_none() {
        return Err(ApiError::bad_request(format!("invalid quality: {quality}")));
    }

    let photo = state.photos.get_by_id(id, &quality).await?;
    Ok(Json(photo))
}

pub async fn delete_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.photos.delete(id).await?;
    tracing::info!("Photo {} deleted", id);
    Ok(Json(StatusResponse::ok()))
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        service: env!("CARGO_PKG_NAME").to_string(),
        service_version: env!("CARGO_PKG_VERSION").to_string(),
        status: "OK".to_string(),
        mode: state.mode.to_string(),
    })
}

pub async fn hello() -> &'static str {
    "welcome"
}
