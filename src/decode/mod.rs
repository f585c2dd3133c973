//! Document decoder module
//!
//! Supports: JSON array, JSONL, auto-detection between the two
//!
//! # Overview
//!
//! Uploaded documents are either one JSON array of objects or newline-delimited
//! objects. The auto decoder tries the array form first and falls back to
//! line-by-line parsing.

mod decoders;
mod types;

pub use decoders::{decoder_for, AutoDecoder, JsonArrayDecoder, JsonlDecoder};
pub use types::{InputDialect, RecordDecoder};

#[cfg(test)]
mod tests;
