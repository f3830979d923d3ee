//! Object handlers that exchange JSON only

use crate::forms::{require_key, CopyFileForm, GetFilesForm, JsonForm, RemoveFileForm, StatusResponse};
use crate::{ApiError, AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use docs_hub_storage::StorageItem;
use std::sync::Arc;
use tracing::info;

/// POST /cloud/{bucket}/files - List one directory level
pub async fn get_files(
    State(state): State<Arc<AppState>>,
    Path(bucket): Path<String>,
    JsonForm(form): JsonForm<GetFilesForm>,
) -> Result<Json<Vec<StorageItem>>, ApiError> {
    let items = state
        .hub
        .cloud()
        .list_files(&bucket, &form.directory)
        .await?;

    Ok(Json(items))
}

/// POST /cloud/{bucket}/file/copy - Server-side copy
pub async fn copy_file(
    State(state): State<Arc<AppState>>,
    Path(bucket): Path<String>,
    JsonForm(form): JsonForm<CopyFileForm>,
) -> Result<Json<StatusResponse>, ApiError> {
    let src = require_key("src_path", &form.src_path)?;
    let dst = require_key("dst_path", &form.dst_path)?;

    state.hub.cloud().copy_file(&bucket, src, dst).await?;
    info!(bucket = %bucket, src = %src, dst = %dst, "Copied file");

    Ok(Json(StatusResponse::ok()))
}

/// POST /cloud/{bucket}/file/move - Copy then remove the source
pub async fn move_file(
    State(state): State<Arc<AppState>>,
    Path(bucket): Path<String>,
    JsonForm(form): JsonForm<CopyFileForm>,
) -> Result<Json<StatusResponse>, ApiError> {
    let src = require_key("src_path", &form.src_path)?;
    let dst = require_key("dst_path", &form.dst_path)?;

    state.hub.cloud().move_file(&bucket, src, dst).await?;
    info!(bucket = %bucket, src = %src, dst = %dst, "Moved file");

    Ok(Json(StatusResponse::ok()))
}

/// DELETE /cloud/{bucket}/file/remove - Remove one object
pub async fn remove_file(
    State(state): State<Arc<AppState>>,
    Path(bucket): Path<String>,
    JsonForm(form): JsonForm<RemoveFileForm>,
) -> Result<Json<StatusResponse>, ApiError> {
    let key = require_key("file_name", &form.file_name)?;

    state.hub.cloud().remove_file(&bucket, key).await?;
    info!(bucket = %bucket, key = %key, "Removed file");

    Ok(Json(StatusResponse::ok()))
}
