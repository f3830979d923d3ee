//! Assemble a full [`CloudStorage`](crate::CloudStorage) from separate capabilities
//!
//! A backend that only serves some capabilities (a read-only mirror, a test
//! fake) implements just those traits and is paired with [`Unsupported`] for
//! the rest.

use crate::{
    BucketStore, DocumentStore, ExpiringStore, Result, ShareStore, StorageError, StorageItem,
};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Placeholder for a capability the backend does not provide
#[derive(Clone, Copy, Debug, Default)]
pub struct Unsupported;

/// One capability implementation per slot
#[derive(Clone, Debug)]
pub struct Composed<B, D, S, E> {
    pub buckets: B,
    pub documents: D,
    pub shares: S,
    pub expiring: E,
}

impl<B, D, S, E> Composed<B, D, S, E> {
    pub fn new(buckets: B, documents: D, shares: S, expiring: E) -> Self {
        Self {
            buckets,
            documents,
            shares,
            expiring,
        }
    }
}

impl<D> Composed<Unsupported, D, Unsupported, Unsupported> {
    /// Backend that only serves document operations
    pub fn documents_only(documents: D) -> Self {
        Self::new(Unsupported, documents, Unsupported, Unsupported)
    }
}

#[async_trait]
impl<B, D, S, E> BucketStore for Composed<B, D, S, E>
where
    B: BucketStore,
    D: Send + Sync,
    S: Send + Sync,
    E: Send + Sync,
{
    async fn list_buckets(&self) -> Result<Vec<String>> {
        self.buckets.list_buckets().await
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        self.buckets.create_bucket(bucket).await
    }

    async fn remove_bucket(&self, bucket: &str) -> Result<()> {
        self.buckets.remove_bucket(bucket).await
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        self.buckets.bucket_exists(bucket).await
    }
}

#[async_trait]
impl<B, D, S, E> DocumentStore for Composed<B, D, S, E>
where
    B: Send + Sync,
    D: DocumentStore,
    S: Send + Sync,
    E: Send + Sync,
{
    async fn list_files(&self, bucket: &str, prefix: &str) -> Result<Vec<StorageItem>> {
        self.documents.list_files(bucket, prefix).await
    }

    async fn upload_file(&self, bucket: &str, key: &str, data: Bytes) -> Result<()> {
        self.documents.upload_file(bucket, key, data).await
    }

    async fn download_file(&self, bucket: &str, key: &str) -> Result<Bytes> {
        self.documents.download_file(bucket, key).await
    }

    async fn copy_file(&self, bucket: &str, src: &str, dst: &str) -> Result<()> {
        self.documents.copy_file(bucket, src, dst).await
    }

    async fn remove_file(&self, bucket: &str, key: &str) -> Result<()> {
        self.documents.remove_file(bucket, key).await
    }

    async fn move_file(&self, bucket: &str, src: &str, dst: &str) -> Result<()> {
        self.documents.move_file(bucket, src, dst).await
    }
}

#[async_trait]
impl<B, D, S, E> ShareStore for Composed<B, D, S, E>
where
    B: Send + Sync,
    D: Send + Sync,
    S: ShareStore,
    E: Send + Sync,
{
    async fn share_url(&self, bucket: &str, key: &str, expires_in: Duration) -> Result<String> {
        self.shares.share_url(bucket, key, expires_in).await
    }
}

#[async_trait]
impl<B, D, S, E> ExpiringStore for Composed<B, D, S, E>
where
    B: Send + Sync,
    D: Send + Sync,
    S: Send + Sync,
    E: ExpiringStore,
{
    async fn upload_expiring(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        self.expiring.upload_expiring(bucket, key, data, expires_at).await
    }
}

#[async_trait]
impl BucketStore for Unsupported {
    async fn list_buckets(&self) -> Result<Vec<String>> {
        Err(StorageError::Unsupported("list buckets"))
    }

    async fn create_bucket(&self, _bucket: &str) -> Result<()> {
        Err(StorageError::Unsupported("create bucket"))
    }

    async fn remove_bucket(&self, _bucket: &str) -> Result<()> {
        Err(StorageError::Unsupported("remove bucket"))
    }

    async fn bucket_exists(&self, _bucket: &str) -> Result<bool> {
        Err(StorageError::Unsupported("bucket exists"))
    }
}

#[async_trait]
impl DocumentStore for Unsupported {
    async fn list_files(&self, _bucket: &str, _prefix: &str) -> Result<Vec<StorageItem>> {
        Err(StorageError::Unsupported("list files"))
    }

    async fn upload_file(&self, _bucket: &str, _key: &str, _data: Bytes) -> Result<()> {
        Err(StorageError::Unsupported("upload file"))
    }

    async fn download_file(&self, _bucket: &str, _key: &str) -> Result<Bytes> {
        Err(StorageError::Unsupported("download file"))
    }

    async fn copy_file(&self, _bucket: &str, _src: &str, _dst: &str) -> Result<()> {
        Err(StorageError::Unsupported("copy file"))
    }

    async fn remove_file(&self, _bucket: &str, _key: &str) -> Result<()> {
        Err(StorageError::Unsupported("remove file"))
    }
}

#[async_trait]
impl ShareStore for Unsupported {
    async fn share_url(&self, _bucket: &str, _key: &str, _expires_in: Duration) -> Result<String> {
        Err(StorageError::Unsupported("share url"))
    }
}

#[async_trait]
impl ExpiringStore for Unsupported {
    async fn upload_expiring(
        &self,
        _bucket: &str,
        _key: &str,
        _data: Bytes,
        _expires_at: DateTime<Utc>,
    ) -> Result<()> {
        Err(StorageError::Unsupported("expiring upload"))
    }
}
