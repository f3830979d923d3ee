//! Error types and their HTTP rendering

use crate::forms::StatusResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use docs_hub_storage::StorageError;
use thiserror::Error;

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request body could not be decoded
    #[error("{0}")]
    Decode(String),

    /// Request decoded but carries an unusable value
    #[error("{0}")]
    Validation(String),

    /// Backend rejected an operation on behalf of the client
    #[error("{0}")]
    Backend(#[source] StorageError),

    /// Backend failed in a way the client cannot fix
    #[error("{0}")]
    Unavailable(#[source] StorageError),

    /// Share link signature or expiry rejected
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    MethodNotAllowed(String),
}

impl ApiError {
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Decode(_) | Self::Validation(_) | Self::Backend(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::Backend(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        (status, Json(StatusResponse::new(status, self.to_string()))).into_response()
    }
}
