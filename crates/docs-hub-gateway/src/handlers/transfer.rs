//! Upload and download handlers

use crate::forms::{require_key, DownloadFileForm, JsonForm, StatusResponse, UploadParams};
use crate::{ApiError, AppState};
use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        rejection::QueryRejection,
        Path, Query, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Multipart field carrying the uploaded files
pub const FILES_FIELD: &str = "files";

/// PUT /cloud/{bucket}/file/upload - Upload one or more files.
///
/// Files are read and stored one at a time. A file that cannot be read or
/// stored is skipped and reported in `files`; the request still succeeds.
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    Path(bucket): Path<String>,
    query: Result<Query<UploadParams>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::decode(e.body_text()))?;
    let Query(params) = query.map_err(|e| ApiError::decode(e.body_text()))?;

    let exists = match state.hub.cloud().bucket_exists(&bucket).await {
        Ok(exists) => exists,
        Err(e) => {
            warn!(bucket = %bucket, error = %e, "Failed to check bucket before upload");
            false
        }
    };
    if !exists {
        return Err(ApiError::validation(format!(
            "specified bucket {} does not exist",
            bucket
        )));
    }

    let expires_at = params.expired.as_deref().and_then(parse_expiry);
    let mut batch = state.hub.begin_upload(&bucket, expires_at);
    let mut seen = 0usize;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) if seen == 0 => return Err(ApiError::decode(e.body_text())),
            Err(e) => {
                warn!(bucket = %bucket, error = %e, "Multipart stream ended early");
                break;
            }
        };
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        seen += 1;

        let file_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                let label = format!("#{}", seen);
                warn!(bucket = %bucket, file = %label, "Skipping file part without a file name");
                batch.skip(&label, "missing file name");
                continue;
            }
        };

        match field.bytes().await {
            Ok(data) => batch.upload(&file_name, data).await,
            Err(e) => {
                warn!(bucket = %bucket, file = %file_name, error = %e, "Failed to read file form");
                batch.skip(&file_name, e.body_text());
            }
        }
    }

    if seen == 0 {
        return Err(ApiError::validation("there are no files into multipart form"));
    }

    let report = batch.finish();
    info!(
        bucket = %bucket,
        uploaded = report.uploaded(),
        failed = report.failed(),
        expiring = expires_at.is_some(),
        "Upload finished"
    );

    Ok(Json(StatusResponse::ok().with_files(report.files)))
}

/// Parse the `expired` query value; an unusable value disables expiry
fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(at) => Some(at.with_timezone(&Utc)),
        Err(e) => {
            warn!(expired = %raw, error = %e, "Failed to parse expired time param, uploading without expiry");
            None
        }
    }
}

/// POST /cloud/{bucket}/file/download - Fetch raw file content
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(bucket): Path<String>,
    JsonForm(form): JsonForm<DownloadFileForm>,
) -> Result<Response, ApiError> {
    let key = require_key("file_name", &form.file_name)?;
    let data = state.hub.cloud().download_file(&bucket, key).await?;

    let mut response = (
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime::APPLICATION_OCTET_STREAM.to_string())],
        data,
    )
        .into_response();

    let base_name = key.rsplit('/').next().unwrap_or(key);
    if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", base_name)) {
        response
            .headers_mut()
            .insert(header::CONTENT_DISPOSITION, value);
    }

    Ok(response)
}
