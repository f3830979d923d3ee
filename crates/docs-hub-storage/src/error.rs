//! Error types for the docs-hub-storage crate

use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during object storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Bucket not found
    #[error("bucket not found: {0}")]
    BucketNotFound(String),

    /// Bucket already exists
    #[error("bucket already exists: {0}")]
    BucketAlreadyExists(String),

    /// Bucket still holds objects
    #[error("bucket is not empty: {0}")]
    BucketNotEmpty(String),

    /// Object not found
    #[error("object not found: {bucket}/{key}")]
    ObjectNotFound { bucket: String, key: String },

    /// Backend cannot be reached
    #[error("cloud is offline: {0}")]
    Offline(String),

    /// Backend rejected the request
    #[error("backend error: {0}")]
    Backend(String),

    /// Presigned URL could not be produced
    #[error("failed to sign share url: {0}")]
    Presign(String),

    /// Share link signature does not match
    #[error("share link signature is invalid")]
    ShareLinkInvalid,

    /// Share link is past its expiry
    #[error("share link expired")]
    ShareLinkExpired,

    /// Copy succeeded but the source could not be removed.
    ///
    /// The object now exists under both `src` and `dst`; nothing is rolled back.
    #[error("move {bucket}/{src} -> {dst} incomplete, source left in place: {source}")]
    MoveIncomplete {
        bucket: String,
        src: String,
        dst: String,
        #[source]
        source: Box<StorageError>,
    },

    /// Capability not provided by this backend
    #[error("operation not supported by this backend: {0}")]
    Unsupported(&'static str),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Create an object-not-found error
    pub fn object_not_found(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ObjectNotFound {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// True when the error means the addressed bucket or object is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BucketNotFound(_) | Self::ObjectNotFound { .. })
    }

    /// True when the backend could not be reached at all
    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Offline(_))
    }
}
