//! Service-level handlers

use crate::forms::{ShareLinkParams, StatusResponse};
use crate::{ApiError, AppState};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use docs_hub_storage::StorageError;
use std::sync::Arc;

/// GET /health - Liveness probe
pub async fn health_check() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}

/// GET /shared/{bucket}/{*key} - Serve a link signed by the in-memory backend
pub async fn open_shared_link(
    State(state): State<Arc<AppState>>,
    Path((bucket, key)): Path<(String, String)>,
    params: Result<Query<ShareLinkParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::Forbidden(e.body_text()))?;

    let memory = state
        .share_links
        .as_ref()
        .ok_or_else(|| ApiError::NotFound("share links are not served here".to_string()))?;

    let data = memory
        .open_share_link(&bucket, &key, params.expires, &params.signature)
        .await
        .map_err(|e| match e {
            StorageError::ShareLinkExpired | StorageError::ShareLinkInvalid => {
                ApiError::Forbidden(e.to_string())
            }
            e if e.is_not_found() => ApiError::NotFound(e.to_string()),
            e => ApiError::Backend(e),
        })?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime::APPLICATION_OCTET_STREAM.to_string())],
        data,
    )
        .into_response())
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound("route not found".to_string())
}

/// Fallback for known routes hit with the wrong method
pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(format!("method {} not allowed on this route", method))
}
