//! # json-ingest
//!
//! Schema-inferring ingestion of uploaded JSON documents into a warehouse.
//!
//! ## Features
//!
//! - **Schema Inference**: typed fields with NULLABLE/REPEATED modes and nested records
//! - **Auto-detected Input**: a JSON array of objects or JSON Lines
//! - **Content-addressed Tables**: one table per distinct schema, `{base}_{fingerprint}`
//! - **Idempotent Provisioning**: concurrent uploads with the same shape share a table
//! - **Completion Events**: Pub/Sub notification once a file is loaded
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use json_ingest::{build_ingestor, PipelineConfig, StorageEvent};
//!
//! #[tokio::main]
//! async fn main() -> json_ingest::Result<()> {
//!     let config = PipelineConfig::from_file("ingest.yaml")?;
//!     let ingestor = build_ingestor(config)?;
//!
//!     let report = ingestor.ingest(&StorageEvent::new("uploads", "users.json")).await?;
//!     println!("{} rows into {}", report.rows, report.table_id);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! StorageEvent
//!      │
//! ┌────┴─────┬──────────┬───────────┬─────────────┬──────────┬──────────┐
//! │  Read    │  Decode  │  Infer    │  Provision  │  Load    │  Notify  │
//! ├──────────┼──────────┼───────────┼─────────────┼──────────┼──────────┤
//! │ GCS / S3 │ JSON     │ Detector  │ DuckDB      │ DuckDB   │ Pub/Sub  │
//! │ Azure    │ JSONL    │ Builder   │ IF NOT      │ row by   │ log      │
//! │ local    │ auto     │ hash      │ EXISTS      │ row      │          │
//! └──────────┴──────────┴───────────┴─────────────┴──────────┴──────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Schema inference from JSON records
pub mod schema;

/// Document decoders (JSON array, JSONL)
pub mod decode;

/// Blob storage access
pub mod storage;

/// Table provisioning and loading
pub mod warehouse;

/// Completion notifications
pub mod notify;

/// End-to-end ingestion
pub mod pipeline;

/// Pipeline configuration
pub mod config;

/// Template interpolation
pub mod template;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::build_ingestor;
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use pipeline::{IngestReport, Ingestor, NotificationOutcome};
pub use schema::{build_schema, detect_field, FieldDescriptor, FieldMode, FieldType, Schema};
pub use storage::StorageEvent;

/// A decoded JSON object; keys keep document order
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
