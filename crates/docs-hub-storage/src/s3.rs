//! S3-compatible backend (MinIO, AWS S3, Ceph RGW, ...)

use crate::{
    check_share_duration, BucketStore, CloudConfig, DocumentStore, ExpiringStore, Result,
    ShareStore, StorageError, StorageItem,
};
use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::{ByteStream, DateTime as S3DateTime};
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Region that must not be sent as a location constraint
const DEFAULT_REGION: &str = "us-east-1";

/// Object store client speaking the S3 API
#[derive(Clone, Debug)]
pub struct S3Cloud {
    client: Client,
    region: String,
}

impl S3Cloud {
    /// Build a client from connection settings.
    ///
    /// No request is made here; an unreachable endpoint surfaces on first use.
    pub fn new(config: &CloudConfig) -> Result<Self> {
        if config.address.trim().is_empty() {
            return Err(StorageError::Configuration(
                "cloud address must not be empty".to_string(),
            ));
        }
        if config.region.trim().is_empty() {
            return Err(StorageError::Configuration(
                "cloud region must not be empty".to_string(),
            ));
        }

        let credentials = Credentials::new(
            &config.username,
            &config.password,
            None,
            None,
            "docs-hub-static",
        );

        let s3_config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(config.endpoint_url())
            .force_path_style(true)
            .build();

        info!(endpoint = %config.endpoint_url(), region = %config.region, "Configured S3 client");

        Ok(Self {
            client: Client::from_conf(s3_config),
            region: config.region.clone(),
        })
    }

    /// Wrap an existing client
    pub fn from_client(client: Client, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let size = data.len();
        let mut request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_length(size as i64)
            .body(ByteStream::from(data));

        if let Some(expires_at) = expires_at {
            request = request.expires(S3DateTime::from_secs(expires_at.timestamp()));
        }

        request
            .send()
            .await
            .map_err(|e| map_sdk_error(e, bucket, Some(key)))?;

        debug!(bucket = %bucket, key = %key, size, "Put object");
        Ok(())
    }
}

#[async_trait]
impl BucketStore for S3Cloud {
    #[instrument(skip(self))]
    async fn list_buckets(&self) -> Result<Vec<String>> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| map_sdk_error(e, "", None))?;

        Ok(output
            .buckets()
            .iter()
            .filter_map(|b| b.name().map(str::to_string))
            .collect())
    }

    #[instrument(skip(self))]
    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        let mut request = self.client.create_bucket().bucket(bucket);

        if self.region != DEFAULT_REGION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }

        request
            .send()
            .await
            .map_err(|e| map_sdk_error(e, bucket, None))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_bucket(&self, bucket: &str) -> Result<()> {
        self.client
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, bucket, None))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                if e.as_service_error().is_some_and(|se| se.is_not_found()) {
                    return Ok(false);
                }
                match map_sdk_error(e, bucket, None) {
                    StorageError::BucketNotFound(_) => Ok(false),
                    other => Err(other),
                }
            }
        }
    }
}

#[async_trait]
impl DocumentStore for S3Cloud {
    #[instrument(skip(self))]
    async fn list_files(&self, bucket: &str, prefix: &str) -> Result<Vec<StorageItem>> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .delimiter("/")
            .into_paginator()
            .send();

        let mut items = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| map_sdk_error(e, bucket, None))?;

            for common in page.common_prefixes() {
                if let Some(dir) = common.prefix() {
                    items.push(StorageItem::from_listing(dir, prefix, None));
                }
            }
            for object in page.contents() {
                if let Some(key) = object.key() {
                    items.push(StorageItem::from_listing(key, prefix, object.e_tag()));
                }
            }
        }

        items.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(items)
    }

    async fn upload_file(&self, bucket: &str, key: &str, data: Bytes) -> Result<()> {
        self.put(bucket, key, data, None).await
    }

    #[instrument(skip(self))]
    async fn download_file(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, bucket, Some(key)))?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(format!("failed to read {}/{}: {}", bucket, key, e)))?;
        Ok(data.into_bytes())
    }

    #[instrument(skip(self))]
    async fn copy_file(&self, bucket: &str, src: &str, dst: &str) -> Result<()> {
        let source = format!("{}/{}", bucket, urlencoding::encode(src));
        self.client
            .copy_object()
            .bucket(bucket)
            .key(dst)
            .copy_source(source)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, bucket, Some(src)))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_file(&self, bucket: &str, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, bucket, Some(key)))?;
        Ok(())
    }
}

#[async_trait]
impl ShareStore for S3Cloud {
    #[instrument(skip(self))]
    async fn share_url(&self, bucket: &str, key: &str, expires_in: Duration) -> Result<String> {
        check_share_duration(expires_in)?;
        let presigning =
            PresigningConfig::expires_in(expires_in).map_err(|e| StorageError::Presign(e.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::Presign(DisplayErrorContext(&e).to_string()))?;

        Ok(request.uri().to_string())
    }
}

#[async_trait]
impl ExpiringStore for S3Cloud {
    async fn upload_expiring(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        self.put(bucket, key, data, Some(expires_at)).await
    }
}

/// Translate an SDK failure into the storage taxonomy
fn map_sdk_error<E, R>(err: SdkError<E, R>, bucket: &str, key: Option<&str>) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    if matches!(
        err,
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_)
    ) {
        return StorageError::Offline(DisplayErrorContext(&err).to_string());
    }

    match err.code() {
        Some("NoSuchBucket") => StorageError::BucketNotFound(bucket.to_string()),
        Some("NoSuchKey") | Some("NotFound") => match key {
            Some(key) => StorageError::object_not_found(bucket, key),
            None => StorageError::BucketNotFound(bucket.to_string()),
        },
        Some("BucketAlreadyExists") | Some("BucketAlreadyOwnedByYou") => {
            StorageError::BucketAlreadyExists(bucket.to_string())
        }
        Some("BucketNotEmpty") => StorageError::BucketNotEmpty(bucket.to_string()),
        _ => {
            let message = err
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| DisplayErrorContext(&err).to_string());
            StorageError::Backend(message)
        }
    }
}
