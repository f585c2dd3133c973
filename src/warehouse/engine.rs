//! DuckDB-backed warehouse
//!
//! Datasets are DuckDB schemas. Tables are created once with the inferred
//! schema and never altered; rows are inserted one statement at a time so a
//! rejected row does not take the others down with it.

use super::sql;
use super::types::{BulkLoader, InsertSummary, ProvisionOutcome, TableProvisioner, TableRef};
use crate::error::{Error, Result, RowError};
use crate::schema::Schema;
use crate::Record;
use async_trait::async_trait;
use duckdb::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Table provisioner and bulk loader over a single DuckDB connection
pub struct DuckDbWarehouse {
    /// DuckDB connection, serialized behind a lock
    conn: Mutex<Connection>,
    /// Where the database lives (for logging)
    location: String,
}

impl std::fmt::Debug for DuckDbWarehouse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDbWarehouse")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl DuckDbWarehouse {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            Error::config(format!("Failed to open DuckDB at {}: {e}", path.display()))
        })?;
        Ok(Self {
            conn: Mutex::new(conn),
            location: path.display().to_string(),
        })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::config(format!("Failed to create DuckDB connection: {e}")))?;
        Ok(Self {
            conn: Mutex::new(conn),
            location: ":memory:".to_string(),
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Other("DuckDB connection lock poisoned".to_string()))
    }

    /// Run a closure against the connection
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> duckdb::Result<T>,
    ) -> Result<T> {
        let conn = self.lock()?;
        Ok(f(&conn)?)
    }

    /// Check whether a table exists
    pub fn table_exists(&self, table: &TableRef) -> Result<bool> {
        let conn = self.lock()?;
        Ok(table_exists(&conn, table)?)
    }

    /// Count the rows of a table
    pub fn row_count(&self, table: &TableRef) -> Result<u64> {
        let query = format!("SELECT count(*) FROM {}", sql::qualified_name(table));
        let count: i64 = self.with_connection(|conn| conn.query_row(&query, [], |row| row.get(0)))?;
        Ok(count as u64)
    }

    /// List the tables of a dataset
    pub fn list_tables(&self, dataset: &str) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT table_name FROM information_schema.tables
             WHERE table_schema = ?
             ORDER BY table_name",
        )?;

        let tables: Vec<String> = stmt
            .query_map(params![dataset], |row| row.get(0))?
            .filter_map(std::result::Result::ok)
            .collect();

        Ok(tables)
    }
}

fn table_exists(conn: &Connection, table: &TableRef) -> duckdb::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT count(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
        params![table.dataset, table.table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

#[async_trait]
impl TableProvisioner for DuckDbWarehouse {
    async fn ensure_table(&self, table: &TableRef, schema: &Schema) -> Result<ProvisionOutcome> {
        // Render first so an unmappable schema fails before touching the database
        let create_sql = sql::create_table_sql(table, schema)?;
        let conn = self.lock()?;

        conn.execute_batch(&format!(
            "CREATE SCHEMA IF NOT EXISTS {};",
            sql::quote_ident(&table.dataset)
        ))
        .map_err(|e| Error::provision(table.to_string(), format!("Failed to create dataset: {e}")))?;

        let exists = table_exists(&conn, table)
            .map_err(|e| Error::provision(table.to_string(), e.to_string()))?;
        if exists {
            info!(table = %table, "Table already exists");
            return Ok(ProvisionOutcome::AlreadyExists);
        }

        debug!("Executing: {}", create_sql);
        conn.execute_batch(&create_sql)
            .map_err(|e| Error::provision(table.to_string(), e.to_string()))?;

        info!(table = %table, columns = schema.len(), "Created table");
        Ok(ProvisionOutcome::Created)
    }
}

#[async_trait]
impl BulkLoader for DuckDbWarehouse {
    async fn insert_rows(
        &self,
        table: &TableRef,
        schema: &Schema,
        rows: &[Record],
    ) -> Result<InsertSummary> {
        let conn = self.lock()?;
        let mut inserted = 0;
        let mut errors = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            let outcome = sql::insert_row_sql(table, schema, row)
                .and_then(|stmt| conn.execute(&stmt, []).map_err(|e| e.to_string()));

            match outcome {
                Ok(_) => inserted += 1,
                Err(message) => errors.push(RowError { index, message }),
            }
        }

        if !errors.is_empty() {
            warn!(table = %table, inserted, rejected = errors.len(), "Rows rejected");
            return Err(Error::PartialInsert {
                table: table.to_string(),
                inserted,
                errors,
            });
        }

        info!(table = %table, rows = inserted, "Data insertion complete");
        Ok(InsertSummary {
            table: table.to_string(),
            inserted,
        })
    }
}
