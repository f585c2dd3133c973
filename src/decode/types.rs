//! Decoder types and traits
//!
//! Defines the core decoder abstractions.

use crate::error::{Error, Result};
use crate::Record;
use serde::{Deserialize, Serialize};

/// Layout of an uploaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputDialect {
    /// Try a JSON array first, fall back to JSON Lines (default)
    #[default]
    Auto,
    /// A single JSON array of objects
    Json,
    /// JSON Lines format (one JSON object per line)
    Jsonl,
}

impl std::str::FromStr for InputDialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "json" | "array" => Ok(Self::Json),
            "jsonl" | "ndjson" => Ok(Self::Jsonl),
            other => Err(Error::invalid_value(
                "input_dialect",
                format!("unknown dialect '{other}' (expected auto, json or jsonl)"),
            )),
        }
    }
}

/// Trait for decoding documents into records
pub trait RecordDecoder: Send + Sync {
    /// Decode a document into an ordered list of records
    fn decode(&self, body: &str) -> Result<Vec<Record>>;

    /// Decode raw bytes, which must be UTF-8
    fn decode_bytes(&self, body: &[u8]) -> Result<Vec<Record>> {
        let text = std::str::from_utf8(body)
            .map_err(|e| Error::malformed(format!("Document is not valid UTF-8: {e}")))?;
        self.decode(text.strip_prefix('\u{feff}').unwrap_or(text))
    }
}
