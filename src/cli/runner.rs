//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::decode::{decoder_for, InputDialect};
use crate::error::{Error, Result, ResultExt};
use crate::notify::{LogNotifier, Notifier, PubSubNotifier};
use crate::pipeline::{IngestReport, Ingestor};
use crate::schema::{SchemaBuilder, DEFAULT_MAX_DEPTH};
use crate::storage::{ObjectStoreReader, StorageEvent};
use crate::warehouse::DuckDbWarehouse;
use futures::stream::{self, StreamExt};
use serde_json::{json, Value};
use std::path::Path;
use std::pin::pin;
use std::sync::Arc;
use tracing::{error, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Infer {
                path,
                dialect,
                max_depth,
                base_table,
                pretty,
            } => self.infer(path, *dialect, *max_depth, base_table.as_deref(), *pretty),
            Commands::Ingest {
                bucket,
                names,
                concurrency,
            } => self.ingest(bucket, names, *concurrency).await,
            Commands::Event { payload } => self.event(payload).await,
        }
    }

    /// Load the pipeline config from `--config` or the environment
    fn load_config(&self) -> Result<PipelineConfig> {
        match &self.cli.config {
            Some(path) => PipelineConfig::from_file(path),
            None => PipelineConfig::from_env(),
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    fn infer(
        &self,
        path: &Path,
        dialect: Option<InputDialect>,
        max_depth: Option<usize>,
        base_table: Option<&str>,
        pretty: bool,
    ) -> Result<()> {
        // A config file is optional here; only its defaults are used
        let config = match &self.cli.config {
            Some(config_path) => Some(PipelineConfig::from_file(config_path)?),
            None => None,
        };

        let dialect = dialect
            .or(config.as_ref().map(|c| c.input_dialect))
            .unwrap_or_default();
        let max_depth = max_depth
            .or(config.as_ref().map(|c| c.max_depth))
            .unwrap_or(DEFAULT_MAX_DEPTH);
        let base_table = base_table
            .or(config.as_ref().map(|c| c.base_table.as_str()))
            .unwrap_or("table");

        let body = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let records = decoder_for(dialect).decode_bytes(&body)?;
        let schema = SchemaBuilder::new().with_max_depth(max_depth).build(&records)?;

        let output = json!({
            "table_id": schema.table_id(base_table),
            "records": records.len(),
            "schema": &schema,
        });
        print_json(&output, pretty)?;

        if self.cli.verbose {
            eprintln!("{schema}");
        }
        Ok(())
    }

    async fn ingest(&self, bucket: &str, names: &[String], concurrency: usize) -> Result<()> {
        let ingestor = build_ingestor(self.load_config()?)?;
        let ingestor = &ingestor;

        let results = stream::iter(names)
            .map(|name| {
                let event = StorageEvent::new(bucket, name.as_str());
                async move {
                    let result = ingestor.ingest(&event).await;
                    (event, result)
                }
            })
            .buffer_unordered(concurrency.max(1));
        let mut results = pin!(results);

        let mut failed = 0;
        while let Some((event, result)) = results.next().await {
            if !report_result(&event, result)? {
                failed += 1;
            }
        }

        info!(total = names.len(), failed, "Ingestion finished");
        if failed > 0 {
            return Err(Error::Other(format!(
                "{failed} of {} event(s) failed",
                names.len()
            )));
        }
        Ok(())
    }

    async fn event(&self, payload: &str) -> Result<()> {
        let payload = match payload.strip_prefix('@') {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read event file {path}"))?,
            None => payload.to_string(),
        };
        let event = StorageEvent::from_json(&payload)?;

        let ingestor = build_ingestor(self.load_config()?)?;
        let report = ingestor.ingest(&event).await?;
        print_report(&report)
    }
}

/// Wire the shipped collaborators from a config
pub fn build_ingestor(config: PipelineConfig) -> Result<Ingestor> {
    let reader = Arc::new(ObjectStoreReader::new(config.storage.clone()));

    let warehouse = Arc::new(match &config.database_path {
        Some(path) => DuckDbWarehouse::open(path)?,
        None => DuckDbWarehouse::open_in_memory()?,
    });
    info!(database = warehouse.location(), "Opened warehouse");

    let notifier: Arc<dyn Notifier> = match &config.topic {
        Some(topic) => {
            let mut notifier =
                PubSubNotifier::new(&config.pubsub_endpoint, topic, config.notify_timeout())?;
            if let Some(token) = &config.pubsub_token {
                notifier = notifier.with_token(token.clone());
            }
            Arc::new(notifier)
        }
        None => Arc::new(LogNotifier),
    };

    Ok(Ingestor::new(
        config,
        reader,
        warehouse.clone(),
        warehouse,
        notifier,
    ))
}

/// Print the outcome of one event; `false` if it failed
fn report_result(event: &StorageEvent, result: Result<IngestReport>) -> Result<bool> {
    match result {
        Ok(report) => {
            print_report(&report)?;
            Ok(true)
        }
        Err(e) => {
            error!(bucket = %event.bucket, name = %event.name, error = %e, "Ingestion failed");
            print_json(
                &json!({
                    "event": event,
                    "error": e.to_string(),
                    "retryable": e.is_retryable(),
                }),
                false,
            )?;
            Ok(false)
        }
    }
}

fn print_report(report: &IngestReport) -> Result<()> {
    print_json(&serde_json::to_value(report)?, false)
}

fn print_json(value: &Value, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
