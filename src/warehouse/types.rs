//! Warehouse types and traits

use crate::error::Result;
use crate::schema::Schema;
use crate::Record;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// Fully qualified destination table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TableRef {
    /// Dataset (a DuckDB schema)
    pub dataset: String,
    /// Table name within the dataset
    pub table: String,
}

impl TableRef {
    pub fn new(dataset: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            table: table.into(),
        }
    }

    /// Table for a schema: `{base}_{fingerprint}` inside `dataset`
    pub fn for_schema(dataset: impl Into<String>, base: &str, schema: &Schema) -> Self {
        Self::new(dataset, schema.table_id(base))
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.dataset, self.table)
    }
}

/// What `ensure_table` found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionOutcome {
    /// The table was created by this call
    Created,
    /// The table was already there (possibly created concurrently)
    AlreadyExists,
}

/// Result of a successful bulk insert
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertSummary {
    pub table: String,
    pub inserted: usize,
}

/// Creates tables for inferred schemas
#[async_trait]
pub trait TableProvisioner: Send + Sync {
    /// Make sure `table` exists with `schema`, creating it if absent
    ///
    /// An existing table is success, not an error. The schema of an existing
    /// table is never altered.
    async fn ensure_table(&self, table: &TableRef, schema: &Schema) -> Result<ProvisionOutcome>;
}

/// Inserts records into a provisioned table
#[async_trait]
pub trait BulkLoader: Send + Sync {
    /// Insert every row, failing with `Error::PartialInsert` if any row is rejected
    async fn insert_rows(
        &self,
        table: &TableRef,
        schema: &Schema,
        rows: &[Record],
    ) -> Result<InsertSummary>;
}
