//! Blob reader backed by `object_store` (GCS, S3, Azure, local, memory)

use super::types::{BlobReader, StorageBackend};
use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Reads objects through one cached store per bucket
#[derive(Debug)]
pub struct ObjectStoreReader {
    backend: StorageBackend,
    stores: RwLock<HashMap<String, Arc<dyn ObjectStore>>>,
}

impl ObjectStoreReader {
    /// Create a reader for a backend; stores are built lazily per bucket
    pub fn new(backend: StorageBackend) -> Self {
        Self {
            backend,
            stores: RwLock::new(HashMap::new()),
        }
    }

    /// Create a reader over process-local memory
    pub fn in_memory() -> Self {
        Self::new(StorageBackend::Memory)
    }

    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    /// Render an object location, e.g. `gs://bucket/name`
    pub fn location(&self, bucket: &str, name: &str) -> String {
        format!("{}://{bucket}/{name}", self.backend.scheme())
    }

    /// Write bytes to an object, creating the bucket store if needed
    pub async fn put(&self, bucket: &str, name: &str, data: Bytes) -> Result<String> {
        if let StorageBackend::Local { root } = &self.backend {
            let dir = root.join(bucket);
            std::fs::create_dir_all(&dir).map_err(|e| {
                Error::transient_io(format!("Failed to create directory {}: {e}", dir.display()))
            })?;
        }

        let store = self.store_for(bucket).await?;
        let location = self.location(bucket, name);
        store
            .put(&ObjectPath::from(name), data.into())
            .await
            .map_err(|e| Error::transient_io(format!("Failed to write {location}: {e}")))?;
        Ok(location)
    }

    /// Get or build the store for a bucket
    async fn store_for(&self, bucket: &str) -> Result<Arc<dyn ObjectStore>> {
        if let Some(store) = self.stores.read().await.get(bucket) {
            return Ok(Arc::clone(store));
        }

        let mut stores = self.stores.write().await;
        if let Some(store) = stores.get(bucket) {
            return Ok(Arc::clone(store));
        }

        debug!(bucket, scheme = self.backend.scheme(), "Creating object store");
        let store = build_store(&self.backend, bucket)?;
        stores.insert(bucket.to_string(), Arc::clone(&store));
        Ok(store)
    }
}

/// Build the store for a bucket
fn build_store(backend: &StorageBackend, bucket: &str) -> Result<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match backend {
        StorageBackend::Gcs => Arc::new(
            GoogleCloudStorageBuilder::from_env()
                .with_bucket_name(bucket)
                .build()
                .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?,
        ),
        StorageBackend::S3 => Arc::new(
            AmazonS3Builder::from_env()
                .with_bucket_name(bucket)
                .build()
                .map_err(|e| Error::config(format!("Failed to create S3 client: {e}")))?,
        ),
        StorageBackend::Azure => Arc::new(
            MicrosoftAzureBuilder::from_env()
                .with_container_name(bucket)
                .build()
                .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?,
        ),
        StorageBackend::Local { root } => {
            let dir = root.join(bucket);
            if !dir.is_dir() {
                return Err(Error::not_found(format!("file://{bucket}")));
            }
            Arc::new(
                LocalFileSystem::new_with_prefix(&dir)
                    .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?,
            )
        }
        StorageBackend::Memory => Arc::new(InMemory::new()),
    };
    Ok(store)
}

#[async_trait]
impl BlobReader for ObjectStoreReader {
    async fn read(&self, bucket: &str, name: &str) -> Result<Bytes> {
        let location = self.location(bucket, name);
        let store = self.store_for(bucket).await?;
        let path = ObjectPath::from(name);

        let result = store.get(&path).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => Error::not_found(location.clone()),
            other => Error::transient_io(format!("Failed to read {location}: {other}")),
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| Error::transient_io(format!("Failed to read {location}: {e}")))?;

        debug!(location = %location, bytes = bytes.len(), "Read object");
        Ok(bytes)
    }
}
