//! In-memory object store for testing and development
//!
//! Implements every capability. Expiring objects disappear once their
//! expiry passes, share links are signed with [`ShareSigner`] and served back
//! through [`MemoryCloud::open_share_link`]. Failure switches let tests put the
//! store offline or make individual keys fail.

use crate::share_link::ShareSigner;
use crate::{
    BucketStore, DocumentStore, ExpiringStore, Result, ShareStore, StorageError, StorageItem,
};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Clone, Debug)]
struct StoredObject {
    data: Bytes,
    etag: String,
    expires_at: Option<DateTime<Utc>>,
}

impl StoredObject {
    fn new(data: Bytes, expires_at: Option<DateTime<Utc>>) -> Self {
        let etag = blake3::hash(&data).to_hex().to_string();
        Self {
            data,
            etag,
            expires_at,
        }
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

type Bucket = BTreeMap<String, StoredObject>;

#[derive(Default)]
struct MemoryState {
    buckets: DashMap<String, Bucket>,
    offline: AtomicBool,
    failing_uploads: DashSet<String>,
    failing_removals: DashSet<String>,
    put_calls: AtomicUsize,
}

/// An in-memory object store
#[derive(Clone)]
pub struct MemoryCloud {
    state: Arc<MemoryState>,
    signer: ShareSigner,
}

impl std::fmt::Debug for MemoryCloud {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCloud")
            .field("buckets", &self.state.buckets.len())
            .field("signer", &self.signer)
            .finish()
    }
}

impl MemoryCloud {
    /// Create an empty store whose share links are rooted at `share_base_url`
    pub fn new(share_base_url: impl Into<String>) -> Self {
        Self::with_signer(ShareSigner::new(share_base_url))
    }

    /// Create an empty store with an explicit share link signer
    pub fn with_signer(signer: ShareSigner) -> Self {
        Self {
            state: Arc::new(MemoryState::default()),
            signer,
        }
    }

    /// Simulate an unreachable backend
    pub fn set_offline(&self, offline: bool) {
        self.state.offline.store(offline, Ordering::SeqCst);
    }

    /// Make every future upload of `key` fail
    pub fn fail_uploads_of(&self, key: impl Into<String>) {
        self.state.failing_uploads.insert(key.into());
    }

    /// Make every future removal of `key` fail
    pub fn fail_removals_of(&self, key: impl Into<String>) {
        self.state.failing_removals.insert(key.into());
    }

    /// Number of put operations that reached the store, failed ones included
    pub fn put_calls(&self) -> usize {
        self.state.put_calls.load(Ordering::SeqCst)
    }

    /// Number of live objects in `bucket`
    pub fn object_count(&self, bucket: &str) -> usize {
        let now = Utc::now();
        self.state
            .buckets
            .get(bucket)
            .map(|objects| objects.values().filter(|o| !o.is_expired(now)).count())
            .unwrap_or(0)
    }

    /// Resolve a link previously produced by [`ShareStore::share_url`]
    pub async fn open_share_link(
        &self,
        bucket: &str,
        key: &str,
        expires: i64,
        signature: &str,
    ) -> Result<Bytes> {
        self.signer
            .verify(bucket, key, expires, signature, Utc::now())?;
        self.download_file(bucket, key).await
    }

    fn ensure_online(&self) -> Result<()> {
        if self.state.offline.load(Ordering::SeqCst) {
            return Err(StorageError::Offline("memory store switched offline".to_string()));
        }
        Ok(())
    }

    fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        self.ensure_online()?;
        self.state.put_calls.fetch_add(1, Ordering::SeqCst);

        if self.state.failing_uploads.contains(key) {
            return Err(StorageError::Backend(format!("upload of {} rejected", key)));
        }

        let mut objects = self
            .state
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| StorageError::BucketNotFound(bucket.to_string()))?;
        objects.insert(key.to_string(), StoredObject::new(data, expires_at));
        debug!(bucket = %bucket, key = %key, "Stored object");
        Ok(())
    }

    /// Drop expired objects of one bucket
    fn purge_expired(objects: &mut Bucket, now: DateTime<Utc>) {
        objects.retain(|_, object| !object.is_expired(now));
    }
}

#[async_trait]
impl BucketStore for MemoryCloud {
    async fn list_buckets(&self) -> Result<Vec<String>> {
        self.ensure_online()?;
        let mut names: Vec<String> = self
            .state
            .buckets
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        self.ensure_online()?;
        if bucket.is_empty() {
            return Err(StorageError::Backend("bucket name cannot be empty".to_string()));
        }

        match self.state.buckets.entry(bucket.to_string()) {
            Entry::Occupied(_) => Err(StorageError::BucketAlreadyExists(bucket.to_string())),
            Entry::Vacant(entry) => {
                entry.insert(BTreeMap::new());
                Ok(())
            }
        }
    }

    async fn remove_bucket(&self, bucket: &str) -> Result<()> {
        self.ensure_online()?;
        let now = Utc::now();

        let removed = self.state.buckets.remove_if_mut(bucket, |_, objects| {
            Self::purge_expired(objects, now);
            objects.is_empty()
        });
        if removed.is_some() {
            return Ok(());
        }

        if self.state.buckets.contains_key(bucket) {
            Err(StorageError::BucketNotEmpty(bucket.to_string()))
        } else {
            Err(StorageError::BucketNotFound(bucket.to_string()))
        }
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        self.ensure_online()?;
        Ok(self.state.buckets.contains_key(bucket))
    }
}

#[async_trait]
impl DocumentStore for MemoryCloud {
    async fn list_files(&self, bucket: &str, prefix: &str) -> Result<Vec<StorageItem>> {
        self.ensure_online()?;
        let now = Utc::now();

        let mut objects = self
            .state
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| StorageError::BucketNotFound(bucket.to_string()))?;
        Self::purge_expired(&mut objects, now);

        let mut files = Vec::new();
        let mut directories = BTreeSet::new();
        for (key, object) in objects.range(prefix.to_string()..) {
            let Some(rest) = key.strip_prefix(prefix) else {
                break;
            };
            match rest.find('/') {
                Some(idx) => {
                    directories.insert(format!("{}{}", prefix, &rest[..=idx]));
                }
                None => files.push(StorageItem::from_listing(
                    key.clone(),
                    prefix,
                    Some(&object.etag),
                )),
            }
        }

        let mut items: Vec<StorageItem> = directories
            .into_iter()
            .map(|dir| StorageItem::from_listing(dir, prefix, None))
            .chain(files)
            .collect();
        items.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(items)
    }

    async fn upload_file(&self, bucket: &str, key: &str, data: Bytes) -> Result<()> {
        self.put(bucket, key, data, None)
    }

    async fn download_file(&self, bucket: &str, key: &str) -> Result<Bytes> {
        self.ensure_online()?;
        let now = Utc::now();

        let mut objects = self
            .state
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| StorageError::BucketNotFound(bucket.to_string()))?;

        let expired = match objects.get(key) {
            Some(object) if !object.is_expired(now) => return Ok(object.data.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            objects.remove(key);
            debug!(bucket = %bucket, key = %key, "Purged expired object");
        }
        Err(StorageError::object_not_found(bucket, key))
    }

    async fn copy_file(&self, bucket: &str, src: &str, dst: &str) -> Result<()> {
        self.ensure_online()?;
        let now = Utc::now();

        let mut objects = self
            .state
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| StorageError::BucketNotFound(bucket.to_string()))?;

        let source = objects
            .get(src)
            .filter(|object| !object.is_expired(now))
            .cloned()
            .ok_or_else(|| StorageError::object_not_found(bucket, src))?;
        objects.insert(dst.to_string(), source);
        Ok(())
    }

    async fn remove_file(&self, bucket: &str, key: &str) -> Result<()> {
        self.ensure_online()?;

        if self.state.failing_removals.contains(key) {
            return Err(StorageError::Backend(format!("removal of {} rejected", key)));
        }

        let mut objects = self
            .state
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| StorageError::BucketNotFound(bucket.to_string()))?;
        // Removing a missing key succeeds, as on S3
        objects.remove(key);
        Ok(())
    }
}

#[async_trait]
impl ShareStore for MemoryCloud {
    async fn share_url(&self, bucket: &str, key: &str, expires_in: Duration) -> Result<String> {
        self.ensure_online()?;
        self.signer.sign(bucket, key, expires_in, Utc::now())
    }
}

#[async_trait]
impl ExpiringStore for MemoryCloud {
    async fn upload_expiring(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        self.put(bucket, key, data, Some(expires_at))
    }
}
