//! CLI module
//!
//! Command-line interface for the ingestion pipeline.
//!
//! # Commands
//!
//! - `infer` - Print the schema and table id of a local document
//! - `ingest` - Run the pipeline for objects in a bucket
//! - `event` - Run the pipeline for a raw storage event payload

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::{build_ingestor, Runner};
