//! Blob storage module
//!
//! Reads uploaded documents from cloud or local storage.
//!
//! # Overview
//!
//! - `StorageEvent` - the upload notification that starts an ingestion
//! - `BlobReader` - trait for fetching object bytes
//! - `ObjectStoreReader` - `object_store` implementation (GCS, S3, Azure, local, memory)

mod reader;
mod types;

pub use reader::ObjectStoreReader;
pub use types::{BlobReader, StorageBackend, StorageEvent};
