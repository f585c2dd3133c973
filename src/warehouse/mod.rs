//! Warehouse module
//!
//! Provisions tables for inferred schemas and loads records into them.
//!
//! # Overview
//!
//! - `TableProvisioner` - create-if-absent, "already exists" is success
//! - `BulkLoader` - insert all rows, report every rejected row
//! - `DuckDbWarehouse` - DuckDB implementation of both

mod engine;
mod sql;
mod types;

pub use engine::DuckDbWarehouse;
pub use sql::{column_type, create_table_sql, insert_row_sql, qualified_name, quote_ident};
pub use types::{BulkLoader, InsertSummary, ProvisionOutcome, TableProvisioner, TableRef};
