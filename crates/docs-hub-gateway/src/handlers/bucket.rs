//! Bucket operation handlers

use crate::forms::{CreateBucketForm, JsonForm, StatusResponse};
use crate::{ApiError, AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::info;

/// GET /cloud/buckets - List all buckets
pub async fn list_buckets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    // The only endpoint whose backend failures are a server fault
    let buckets = state
        .hub
        .cloud()
        .list_buckets()
        .await
        .map_err(ApiError::Unavailable)?;

    Ok(Json(buckets))
}

/// PUT /cloud/bucket - Create bucket
pub async fn create_bucket(
    State(state): State<Arc<AppState>>,
    JsonForm(form): JsonForm<CreateBucketForm>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.hub.cloud().create_bucket(&form.bucket_name).await?;
    info!(bucket = %form.bucket_name, "Created bucket");

    Ok(Json(StatusResponse::ok()))
}

/// DELETE /cloud/{bucket} - Remove bucket
pub async fn remove_bucket(
    State(state): State<Arc<AppState>>,
    Path(bucket): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.hub.cloud().remove_bucket(&bucket).await?;
    info!(bucket = %bucket, "Removed bucket");

    Ok(Json(StatusResponse::ok()))
}
