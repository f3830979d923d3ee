//! # Docs Hub Storage
//!
//! Object storage abstraction layer for the Docs Hub gateway.
//!
//! This crate provides:
//! - **Capability traits**: buckets, documents, share links and expiring uploads,
//!   each a separate contract so partial backends only implement what they serve
//! - **DocumentHub**: the façade handed to the transport layer
//! - **Directory model**: non-recursive listing over a flat key namespace
//! - **Backends**: an S3-compatible driver and an in-memory store
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    DocumentHub                      │
//! ├─────────────────────────────────────────────────────┤
//! │                 CloudStorage trait                  │
//! ├─────────────┬──────────────┬───────────┬────────────┤
//! │ BucketStore │DocumentStore │ShareStore │ExpiringStore│
//! ├─────────────┴──────┬───────┴───────────┴────────────┤
//! │      S3Cloud       │  MemoryCloud  │   Composed     │
//! └────────────────────┴───────────────┴────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use docs_hub_storage::{DocumentHub, MemoryCloud};
//!
//! let hub = DocumentHub::new(MemoryCloud::new("http://localhost:2866"));
//! hub.cloud().create_bucket("reports").await?;
//! hub.cloud().upload_file("reports", "2024/q1.pdf", data).await?;
//! let items = hub.cloud().list_files("reports", "2024/").await?;
//! ```

pub mod compose;
pub mod config;
pub mod error;
pub mod hub;
pub mod item;
pub mod memory;
pub mod s3;
pub mod share_link;

pub use compose::{Composed, Unsupported};
pub use config::CloudConfig;
pub use error::{Result, StorageError};
pub use hub::{DocumentHub, FileOutcome, UploadBatch, UploadReport};
pub use item::{is_virtual_directory, StorageItem};
pub use memory::MemoryCloud;
pub use s3::S3Cloud;
pub use share_link::ShareSigner;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Longest lifetime a share link may be signed for (7 days)
pub const MAX_SHARE_DURATION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Bucket management
#[async_trait]
pub trait BucketStore: Send + Sync {
    /// List all bucket names
    async fn list_buckets(&self) -> Result<Vec<String>>;

    /// Create a bucket; name rules are enforced by the backend
    async fn create_bucket(&self, bucket: &str) -> Result<()>;

    /// Remove an empty bucket
    async fn remove_bucket(&self, bucket: &str) -> Result<()>;

    /// Check whether a bucket exists
    async fn bucket_exists(&self, bucket: &str) -> Result<bool>;
}

/// Object operations inside a bucket
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List one level of entries under `prefix`
    async fn list_files(&self, bucket: &str, prefix: &str) -> Result<Vec<StorageItem>>;

    /// Store `data` under `key`
    async fn upload_file(&self, bucket: &str, key: &str, data: Bytes) -> Result<()>;

    /// Fetch the full content of `key`
    async fn download_file(&self, bucket: &str, key: &str) -> Result<Bytes>;

    /// Server-side copy within one bucket
    async fn copy_file(&self, bucket: &str, src: &str, dst: &str) -> Result<()>;

    /// Remove `key`
    async fn remove_file(&self, bucket: &str, key: &str) -> Result<()>;

    /// Move `src` to `dst` as copy followed by removal of the source.
    ///
    /// The two steps are not atomic. When the copy fails nothing changed. When
    /// the removal fails the object exists at both keys and
    /// [`StorageError::MoveIncomplete`] is returned; the copy is not undone.
    /// Moving a key onto itself leaves the object untouched.
    async fn move_file(&self, bucket: &str, src: &str, dst: &str) -> Result<()> {
        if src == dst {
            tracing::debug!(bucket = %bucket, key = %src, "Move onto the same key, nothing to do");
            return Ok(());
        }

        self.copy_file(bucket, src, dst).await?;

        if let Err(e) = self.remove_file(bucket, src).await {
            tracing::warn!(
                bucket = %bucket,
                src = %src,
                dst = %dst,
                error = %e,
                "Move copied object but failed to remove source"
            );
            return Err(StorageError::MoveIncomplete {
                bucket: bucket.to_string(),
                src: src.to_string(),
                dst: dst.to_string(),
                source: Box::new(e),
            });
        }

        Ok(())
    }
}

/// Time-limited share links
#[async_trait]
pub trait ShareStore: Send + Sync {
    /// Produce a signed GET url for `key` valid for `expires_in`
    async fn share_url(&self, bucket: &str, key: &str, expires_in: Duration) -> Result<String>;
}

/// Uploads that carry an absolute expiry
#[async_trait]
pub trait ExpiringStore: Send + Sync {
    /// Store `data` under `key`, to become unavailable after `expires_at`
    async fn upload_expiring(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;
}

/// The full capability set a [`DocumentHub`] needs
pub trait CloudStorage: BucketStore + DocumentStore + ShareStore + ExpiringStore {}

impl<T> CloudStorage for T where T: BucketStore + DocumentStore + ShareStore + ExpiringStore {}

/// Reject share durations the signers cannot honour
pub(crate) fn check_share_duration(expires_in: Duration) -> Result<()> {
    if expires_in.is_zero() {
        return Err(StorageError::Presign("expiry must be positive".to_string()));
    }
    if expires_in > MAX_SHARE_DURATION {
        return Err(StorageError::Presign(format!(
            "expiry of {}s exceeds the maximum of {}s",
            expires_in.as_secs(),
            MAX_SHARE_DURATION.as_secs()
        )));
    }
    Ok(())
}
