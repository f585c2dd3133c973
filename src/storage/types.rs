//! Storage types and traits

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Upload notification that triggers one ingestion
///
/// Only `bucket` and `name` are required; the remaining fields follow the
/// GCS object metadata layout and are kept for logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageEvent {
    /// Bucket (or container) holding the object
    pub bucket: String,
    /// Object name within the bucket
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Object size in bytes; GCS sends it as a decimal string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_created: Option<DateTime<Utc>>,
}

impl StorageEvent {
    /// Create an event for an object
    pub fn new(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            name: name.into(),
            content_type: None,
            size: None,
            time_created: None,
        }
    }

    /// Parse an event from its JSON payload
    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// `bucket/name`, for log lines
    pub fn location(&self) -> String {
        format!("{}/{}", self.bucket, self.name)
    }
}

/// Where blobs are read from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StorageBackend {
    /// Google Cloud Storage, credentials from the environment
    #[default]
    Gcs,
    /// AWS S3 (or S3-compatible, via `AWS_ENDPOINT`)
    S3,
    /// Azure Blob Storage
    Azure,
    /// Local directory; each bucket is a sub-directory of `root`
    Local { root: PathBuf },
    /// Process-local in-memory store
    Memory,
}

impl StorageBackend {
    /// URL scheme used when rendering object locations
    pub fn scheme(&self) -> &'static str {
        match self {
            StorageBackend::Gcs => "gs",
            StorageBackend::S3 => "s3",
            StorageBackend::Azure => "az",
            StorageBackend::Local { .. } => "file",
            StorageBackend::Memory => "memory",
        }
    }
}

/// Reads the raw bytes of an uploaded object
#[async_trait]
pub trait BlobReader: Send + Sync {
    /// Fetch the full object
    ///
    /// Fails with `Error::NotFound` when the object does not exist and
    /// `Error::TransientIo` for any other storage failure.
    async fn read(&self, bucket: &str, name: &str) -> Result<Bytes>;
}
