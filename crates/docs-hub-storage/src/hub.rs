//! The façade handed to the transport layer

use crate::CloudStorage;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared handle to one backend implementing every capability.
///
/// Cloning is cheap; the hub holds no per-request state.
#[derive(Clone)]
pub struct DocumentHub {
    cloud: Arc<dyn CloudStorage>,
}

impl std::fmt::Debug for DocumentHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentHub").finish_non_exhaustive()
    }
}

impl DocumentHub {
    /// Wrap a backend
    pub fn new(cloud: impl CloudStorage + 'static) -> Self {
        Self {
            cloud: Arc::new(cloud),
        }
    }

    /// Wrap an already shared backend
    pub fn from_arc(cloud: Arc<dyn CloudStorage>) -> Self {
        Self { cloud }
    }

    /// The backend
    pub fn cloud(&self) -> &dyn CloudStorage {
        self.cloud.as_ref()
    }

    /// Start a multi-file upload into `bucket`.
    ///
    /// With `expires_at` set every file goes through the expiring upload,
    /// otherwise through the plain one.
    pub fn begin_upload(&self, bucket: &str, expires_at: Option<DateTime<Utc>>) -> UploadBatch<'_> {
        UploadBatch {
            cloud: self.cloud(),
            bucket: bucket.to_string(),
            expires_at,
            report: UploadReport::default(),
        }
    }
}

/// Result for one file of a multi-file upload
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutcome {
    pub file_name: String,
    pub uploaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-file results of a multi-file upload
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UploadReport {
    pub files: Vec<FileOutcome>,
}

impl UploadReport {
    pub fn uploaded(&self) -> usize {
        self.files.iter().filter(|f| f.uploaded).count()
    }

    pub fn failed(&self) -> usize {
        self.files.len() - self.uploaded()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Sequential multi-file upload.
///
/// Files are sent one at a time as the caller reads them, so only one file
/// buffer is alive at once. A failing file is logged and recorded; it never
/// stops the batch.
pub struct UploadBatch<'a> {
    cloud: &'a dyn CloudStorage,
    bucket: String,
    expires_at: Option<DateTime<Utc>>,
    report: UploadReport,
}

impl UploadBatch<'_> {
    /// Upload one file and record the outcome
    pub async fn upload(&mut self, file_name: &str, data: Bytes) {
        let size = data.len();
        let result = match self.expires_at {
            Some(expires_at) => {
                self.cloud
                    .upload_expiring(&self.bucket, file_name, data, expires_at)
                    .await
            }
            None => self.cloud.upload_file(&self.bucket, file_name, data).await,
        };

        match result {
            Ok(()) => {
                debug!(bucket = %self.bucket, file = %file_name, size, "Uploaded file");
                self.report.files.push(FileOutcome {
                    file_name: file_name.to_string(),
                    uploaded: true,
                    error: None,
                });
            }
            Err(e) => {
                warn!(bucket = %self.bucket, file = %file_name, error = %e, "Failed to upload file to cloud");
                self.skip(file_name, e.to_string());
            }
        }
    }

    /// Record a file that could not be read from the request
    pub fn skip(&mut self, file_name: &str, reason: impl Into<String>) {
        let reason = reason.into();
        debug!(bucket = %self.bucket, file = %file_name, reason = %reason, "Skipping file");
        self.report.files.push(FileOutcome {
            file_name: file_name.to_string(),
            uploaded: false,
            error: Some(reason),
        });
    }

    pub fn finish(self) -> UploadReport {
        self.report
    }
}
