//! CLI commands and argument parsing

use crate::decode::InputDialect;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Infer table schemas from uploaded JSON and load it into a warehouse
#[derive(Parser, Debug)]
#[command(name = "json-ingest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pipeline configuration file (YAML); `INGEST_*` environment variables otherwise
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Infer the schema of a local document
    Infer {
        /// JSON or JSON Lines file
        path: PathBuf,

        /// Document layout (defaults to the configured dialect, else auto)
        #[arg(long, value_enum)]
        dialect: Option<InputDialect>,

        /// Maximum nesting depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Table name prefix used for the derived table id
        #[arg(long)]
        base_table: Option<String>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Run the pipeline for objects in a bucket
    Ingest {
        /// Bucket holding the objects
        #[arg(short, long)]
        bucket: String,

        /// Object names
        #[arg(required = true)]
        names: Vec<String>,

        /// Events processed at once
        #[arg(long, default_value = "4")]
        concurrency: usize,
    },

    /// Run the pipeline for a raw storage event
    Event {
        /// Event JSON, or `@path` to read it from a file
        payload: String,
    },
}
