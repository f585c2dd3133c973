//! Ingestion pipeline
//!
//! Runs one upload event end to end:
//! read → decode → infer → provision → load → notify.
//!
//! All collaborators are injected, so the same `Ingestor` drives cloud
//! storage and warehouses in production and in-memory fakes in tests.
//! Any failure before the notification aborts the event; a failed
//! notification is logged and reported but never undoes the load.

mod types;

pub use types::{IngestReport, NotificationOutcome};

use crate::config::PipelineConfig;
use crate::decode::{decoder_for, RecordDecoder};
use crate::error::Result;
use crate::notify::{CompletionEvent, Notifier};
use crate::schema::{Schema, SchemaBuilder};
use crate::storage::{BlobReader, StorageEvent};
use crate::warehouse::{BulkLoader, TableProvisioner, TableRef};
use crate::Record;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Schema-inferring ingestion of uploaded JSON documents
pub struct Ingestor {
    config: PipelineConfig,
    decoder: Box<dyn RecordDecoder>,
    builder: SchemaBuilder,
    reader: Arc<dyn BlobReader>,
    provisioner: Arc<dyn TableProvisioner>,
    loader: Arc<dyn BulkLoader>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for Ingestor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ingestor")
            .field("config", &self.config)
            .field("builder", &self.builder)
            .finish_non_exhaustive()
    }
}

impl Ingestor {
    /// Create an ingestor over the given collaborators
    pub fn new(
        config: PipelineConfig,
        reader: Arc<dyn BlobReader>,
        provisioner: Arc<dyn TableProvisioner>,
        loader: Arc<dyn BulkLoader>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            decoder: decoder_for(config.input_dialect),
            builder: config.schema_builder(),
            config,
            reader,
            provisioner,
            loader,
            notifier,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Decode a document and infer its schema
    pub fn infer(&self, body: &[u8]) -> Result<(Vec<Record>, Schema)> {
        let records = self.decoder.decode_bytes(body)?;
        let schema = self.builder.build(&records)?;
        Ok((records, schema))
    }

    /// Ingest one uploaded object
    pub async fn ingest(&self, event: &StorageEvent) -> Result<IngestReport> {
        let started_at = Utc::now();
        info!(bucket = %event.bucket, name = %event.name, "Ingesting object");

        let body = self.reader.read(&event.bucket, &event.name).await?;
        debug!(bytes = body.len(), "Read object");

        let (records, schema) = self.infer(&body)?;
        let table = TableRef::for_schema(&self.config.dataset, &self.config.base_table, &schema);
        info!(
            table = %table,
            records = records.len(),
            fields = schema.len(),
            "Inferred schema"
        );

        let provision = self.provisioner.ensure_table(&table, &schema).await?;
        let summary = self.loader.insert_rows(&table, &schema, &records).await?;
        info!(table = %table, rows = summary.inserted, "Loaded rows");

        let notification = self.notify(&event.name, &table.table).await;

        let report = IngestReport {
            event: event.clone(),
            dataset: table.dataset,
            table_id: table.table,
            provision,
            rows: summary.inserted,
            schema,
            notification,
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            name = %event.name,
            table = %report.table_id,
            duration_ms = report.duration_ms(),
            "Ingestion complete"
        );
        Ok(report)
    }

    async fn notify(&self, file_name: &str, table_id: &str) -> NotificationOutcome {
        let event = CompletionEvent::completed(file_name, table_id);
        match self.notifier.publish(&event).await {
            Ok(()) => NotificationOutcome::Published,
            Err(e) => {
                warn!(file_name, table_id, error = %e, "Completion notification failed");
                NotificationOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }
}
