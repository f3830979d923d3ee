//! Request and response bodies

use crate::ApiError;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use docs_hub_storage::FileOutcome;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Envelope returned by every non-download endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: u16,
    pub message: String,
    /// Per-file results, present on multi-file uploads only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileOutcome>>,
}

impl StatusResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            files: None,
        }
    }

    pub fn ok() -> Self {
        Self::new(StatusCode::OK, "Ok")
    }

    pub fn ok_with(message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, message)
    }

    pub fn with_files(mut self, files: Vec<FileOutcome>) -> Self {
        self.files = Some(files);
        self
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateBucketForm {
    pub bucket_name: String,
}

#[derive(Debug, Deserialize)]
pub struct GetFilesForm {
    /// Prefix to list; empty lists the bucket root
    #[serde(default)]
    pub directory: String,
}

#[derive(Debug, Deserialize)]
pub struct CopyFileForm {
    pub src_path: String,
    pub dst_path: String,
}

#[derive(Debug, Deserialize)]
pub struct DownloadFileForm {
    pub file_name: String,
}

#[derive(Debug, Deserialize)]
pub struct RemoveFileForm {
    pub file_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ShareFileForm {
    pub file_name: String,
    /// Accepted for compatibility; the key is `file_name` alone
    #[serde(default)]
    pub dir_path: String,
    pub expired_secs: i32,
}

/// Query string of the upload endpoint
#[derive(Debug, Default, Deserialize)]
pub struct UploadParams {
    /// RFC3339 instant after which uploaded files expire
    pub expired: Option<String>,
}

/// Query string of a self-signed share link
#[derive(Debug, Deserialize)]
pub struct ShareLinkParams {
    pub expires: i64,
    pub signature: String,
}

/// JSON body extractor that rejects with [`ApiError::Decode`].
///
/// Unlike `axum::Json` it does not insist on a `Content-Type` header, so any
/// undecodable body maps to the same 400 envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonForm<T>(pub T);

impl<T, S> FromRequest<S> for JsonForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::decode(e.body_text()))?;

        serde_json::from_slice(&body)
            .map(JsonForm)
            .map_err(|e| ApiError::decode(format!("invalid request body: {}", e)))
    }
}

/// Reject an empty object key
pub(crate) fn require_key<'a>(field: &str, value: &'a str) -> Result<&'a str, ApiError> {
    if value.is_empty() {
        return Err(ApiError::validation(format!("{} must not be empty", field)));
    }
    Ok(value)
}
