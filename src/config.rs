//! Pipeline configuration
//!
//! Loaded from YAML (with `{{ env.NAME }}` interpolation) or straight from
//! `INGEST_*` environment variables.

use crate::decode::InputDialect;
use crate::error::{Error, Result};
use crate::notify::DEFAULT_PUBSUB_ENDPOINT;
use crate::schema::{SchemaBuilder, DEFAULT_MAX_DEPTH};
use crate::storage::StorageBackend;
use crate::template::{self, TemplateContext};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

/// Dataset and table names must be plain SQL identifiers
static IDENTIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex is valid")
});

// ============================================================================
// Environment variable names
// ============================================================================

pub const ENV_DATASET: &str = "INGEST_DATASET";
pub const ENV_BASE_TABLE: &str = "INGEST_BASE_TABLE";
pub const ENV_TOPIC: &str = "INGEST_TOPIC";
pub const ENV_STORAGE: &str = "INGEST_STORAGE";
pub const ENV_LOCAL_ROOT: &str = "INGEST_LOCAL_ROOT";
pub const ENV_DATABASE_PATH: &str = "INGEST_DATABASE_PATH";
pub const ENV_MAX_DEPTH: &str = "INGEST_MAX_DEPTH";
pub const ENV_INPUT_DIALECT: &str = "INGEST_INPUT_DIALECT";
pub const ENV_PUBSUB_ENDPOINT: &str = "INGEST_PUBSUB_ENDPOINT";
pub const ENV_PUBSUB_TOKEN: &str = "INGEST_PUBSUB_TOKEN";
pub const ENV_NOTIFY_TIMEOUT_SECS: &str = "INGEST_NOTIFY_TIMEOUT_SECS";

// ============================================================================
// Pipeline Config
// ============================================================================

/// Everything one ingestion deployment needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Destination dataset
    pub dataset: String,

    /// Prefix of every table id (`{base_table}_{hash}`)
    pub base_table: String,

    /// Pub/Sub topic for completion events; logged only when absent
    #[serde(default)]
    pub topic: Option<String>,

    /// Where uploads are read from
    #[serde(default)]
    pub storage: StorageBackend,

    /// DuckDB file; in-memory when absent
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Maximum nesting depth accepted by inference
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Layout of uploaded documents
    #[serde(default)]
    pub input_dialect: InputDialect,

    #[serde(default = "default_pubsub_endpoint")]
    pub pubsub_endpoint: Url,

    /// Bearer token for the Pub/Sub endpoint
    #[serde(default, skip_serializing)]
    pub pubsub_token: Option<String>,

    #[serde(default = "default_notify_timeout_secs")]
    pub notify_timeout_secs: u64,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_pubsub_endpoint() -> Url {
    Url::parse(DEFAULT_PUBSUB_ENDPOINT).expect("default endpoint is a valid URL")
}

fn default_notify_timeout_secs() -> u64 {
    10
}

impl PipelineConfig {
    /// Config with defaults for everything but the destination
    pub fn new(dataset: impl Into<String>, base_table: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            base_table: base_table.into(),
            topic: None,
            storage: StorageBackend::default(),
            database_path: None,
            max_depth: default_max_depth(),
            input_dialect: InputDialect::default(),
            pubsub_endpoint: default_pubsub_endpoint(),
            pubsub_token: None,
            notify_timeout_secs: default_notify_timeout_secs(),
        }
    }

    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from `INGEST_*` variables resolved through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let require = |name: &str| get(name).ok_or_else(|| Error::missing_field(name));

        let mut config = Self::new(require(ENV_DATASET)?, require(ENV_BASE_TABLE)?);
        config.topic = get(ENV_TOPIC);
        config.database_path = get(ENV_DATABASE_PATH).map(PathBuf::from);
        config.pubsub_token = get(ENV_PUBSUB_TOKEN);

        if let Some(kind) = get(ENV_STORAGE) {
            config.storage = match kind.trim().to_ascii_lowercase().as_str() {
                "gcs" | "gs" => StorageBackend::Gcs,
                "s3" => StorageBackend::S3,
                "azure" | "az" => StorageBackend::Azure,
                "memory" => StorageBackend::Memory,
                "local" | "file" => StorageBackend::Local {
                    root: PathBuf::from(require(ENV_LOCAL_ROOT)?),
                },
                other => {
                    return Err(Error::invalid_value(
                        ENV_STORAGE,
                        format!("unknown storage backend '{other}'"),
                    ))
                }
            };
        }

        if let Some(depth) = get(ENV_MAX_DEPTH) {
            config.max_depth = parse_number(ENV_MAX_DEPTH, &depth)?;
        }
        if let Some(dialect) = get(ENV_INPUT_DIALECT) {
            config.input_dialect = dialect.parse()?;
        }
        if let Some(endpoint) = get(ENV_PUBSUB_ENDPOINT) {
            config.pubsub_endpoint = Url::parse(endpoint.trim())
                .map_err(|e| Error::invalid_value(ENV_PUBSUB_ENDPOINT, e.to_string()))?;
        }
        if let Some(secs) = get(ENV_NOTIFY_TIMEOUT_SECS) {
            config.notify_timeout_secs = parse_number(ENV_NOTIFY_TIMEOUT_SECS, &secs)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse YAML, interpolating `{{ env.NAME }}` from the process environment
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Self::from_yaml_str_with(yaml, &TemplateContext::from_env())
    }

    /// Parse YAML, interpolating from `ctx`
    pub fn from_yaml_str_with(yaml: &str, ctx: &TemplateContext) -> Result<Self> {
        let rendered = template::render(yaml, ctx)?;
        let config: Self = serde_yaml::from_str(&rendered)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Check names and limits
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("dataset", &self.dataset), ("base_table", &self.base_table)] {
            if !IDENTIFIER_REGEX.is_match(value) {
                return Err(Error::invalid_value(
                    field,
                    format!("'{value}' is not a valid identifier"),
                ));
            }
        }

        if self.max_depth == 0 {
            return Err(Error::invalid_value("max_depth", "must be at least 1"));
        }

        if matches!(&self.topic, Some(topic) if topic.trim().is_empty()) {
            return Err(Error::invalid_value("topic", "must not be empty"));
        }

        Ok(())
    }

    /// Schema builder honoring `max_depth`
    pub fn schema_builder(&self) -> SchemaBuilder {
        SchemaBuilder::new().with_max_depth(self.max_depth)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(self.notify_timeout_secs)
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::invalid_value(field, format!("'{value}': {e}")))
}
