//! Error types for json-ingest
//!
//! This module defines the error hierarchy for the whole pipeline.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use std::fmt;
use thiserror::Error;

/// A single row rejected by the bulk loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// Zero-based index of the row in the input sequence
    pub index: usize,
    /// Why the row was rejected
    pub message: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.index, self.message)
    }
}

/// The main error type for json-ingest
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Input & Inference Errors
    // ============================================================================
    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    #[error("No records to infer a schema from")]
    EmptyInput,

    #[error("Field '{field}' exceeds the maximum nesting depth of {max_depth}")]
    DepthExceeded { field: String, max_depth: usize },

    /// Records disagree with the schema inferred from the sample record.
    /// Inference never raises this; it only inspects the first record.
    #[error("Schema mismatch: {message}")]
    SchemaMismatch { message: String },

    // ============================================================================
    // Storage Errors
    // ============================================================================
    #[error("Object not found: {location}")]
    NotFound { location: String },

    #[error("Transient I/O error: {message}")]
    TransientIo { message: String },

    // ============================================================================
    // Warehouse Errors
    // ============================================================================
    #[error("Failed to provision table '{table}': {message}")]
    TableProvision { table: String, message: String },

    #[error("Database error: {0}")]
    Database(#[from] duckdb::Error),

    #[error(
        "Insert into '{table}' rejected {} row(s) ({inserted} inserted): {}",
        .errors.len(),
        summarize_rows(.errors)
    )]
    PartialInsert {
        table: String,
        inserted: usize,
        errors: Vec<RowError>,
    },

    // ============================================================================
    // Notification Errors
    // ============================================================================
    #[error("Notification failed: {message}")]
    Notification { message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

/// Show the first few row errors, the rest are summarized as a count
fn summarize_rows(errors: &[RowError]) -> String {
    const SHOWN: usize = 3;
    let mut parts: Vec<String> = errors.iter().take(SHOWN).map(ToString::to_string).collect();
    if errors.len() > SHOWN {
        parts.push(format!("and {} more", errors.len() - SHOWN));
    }
    parts.join("; ")
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a malformed input error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(location: impl Into<String>) -> Self {
        Self::NotFound {
            location: location.into(),
        }
    }

    /// Create a transient I/O error
    pub fn transient_io(message: impl Into<String>) -> Self {
        Self::TransientIo {
            message: message.into(),
        }
    }

    /// Create a table provisioning error
    pub fn provision(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TableProvision {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create a notification error
    pub fn notification(message: impl Into<String>) -> Self {
        Self::Notification {
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    ///
    /// The pipeline never retries on its own; the triggering framework
    /// consults this to decide whether to redeliver the event.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::TransientIo { .. } | Error::Http(_) | Error::Notification { .. }
        )
    }
}

/// Result type alias for json-ingest
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
