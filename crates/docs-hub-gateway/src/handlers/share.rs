//! Share link handler

use crate::forms::{require_key, JsonForm, ShareFileForm, StatusResponse};
use crate::{ApiError, AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// POST /cloud/{bucket}/file/share - Produce a time-limited download url.
///
/// The url is returned as the envelope's `message`.
pub async fn share_file(
    State(state): State<Arc<AppState>>,
    Path(bucket): Path<String>,
    JsonForm(form): JsonForm<ShareFileForm>,
) -> Result<Json<StatusResponse>, ApiError> {
    let key = require_key("file_name", &form.file_name)?;
    if form.expired_secs <= 0 {
        return Err(ApiError::validation("expired_secs must be positive"));
    }
    if !form.dir_path.is_empty() {
        debug!(dir_path = %form.dir_path, "Ignoring dir_path, file_name is the full key");
    }

    let expires_in = Duration::from_secs(u64::from(form.expired_secs.unsigned_abs()));
    let url = state.hub.cloud().share_url(&bucket, key, expires_in).await?;
    info!(bucket = %bucket, key = %key, expires_in_secs = form.expired_secs, "Shared file");

    Ok(Json(StatusResponse::ok_with(url)))
}
