//! Decoder implementations
//!
//! Each decoder handles one document layout; `AutoDecoder` picks between them.

use super::types::{InputDialect, RecordDecoder};
use crate::error::{Error, Result};
use crate::Record;
use serde_json::Value;
use tracing::debug;

// ============================================================================
// JSON Array Decoder
// ============================================================================

/// Decoder for a document holding a single JSON array of objects
#[derive(Debug, Clone, Default)]
pub struct JsonArrayDecoder;

impl JsonArrayDecoder {
    /// Create a new JSON array decoder
    pub fn new() -> Self {
        Self
    }
}

impl RecordDecoder for JsonArrayDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Record>> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| Error::malformed(format!("Failed to parse JSON: {e}")))?;

        match value {
            Value::Array(items) => records_from_array(items),
            _ => Err(Error::malformed(
                "JSON document must contain an array of objects",
            )),
        }
    }
}

/// Every element of a parsed array must be an object
fn records_from_array(items: Vec<Value>) -> Result<Vec<Record>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(Error::malformed(format!(
                "Array element {index} is {}, expected an object",
                kind_of(&other)
            ))),
        })
        .collect()
}

// ============================================================================
// JSONL Decoder
// ============================================================================

/// JSON Lines decoder (one JSON object per line)
#[derive(Debug, Clone, Default)]
pub struct JsonlDecoder;

impl JsonlDecoder {
    /// Create a new JSONL decoder
    pub fn new() -> Self {
        Self
    }
}

impl RecordDecoder for JsonlDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Record>> {
        let mut records = Vec::new();

        for (line_num, line) in split_lines(body).enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let value: Value = serde_json::from_str(line).map_err(|e| {
                Error::malformed(format!("Failed to parse JSONL at line {}: {e}", line_num + 1))
            })?;

            match value {
                Value::Object(map) => records.push(map),
                other => {
                    return Err(Error::malformed(format!(
                        "JSONL line {} is {}, expected an object",
                        line_num + 1,
                        kind_of(&other)
                    )))
                }
            }
        }

        Ok(records)
    }
}

/// Split on `\n`, `\r\n` or a lone `\r`
fn split_lines(body: &str) -> impl Iterator<Item = &str> {
    body.split('\n').flat_map(|line| {
        line.strip_suffix('\r').unwrap_or(line).split('\r')
    })
}

// ============================================================================
// Auto Decoder
// ============================================================================

/// Tries the whole document as a JSON array, then falls back to JSON Lines
///
/// The fallback happens only when the document does not parse as JSON.
/// Valid JSON that is not an array of objects is an error.
#[derive(Debug, Clone, Default)]
pub struct AutoDecoder {
    lines: JsonlDecoder,
}

impl AutoDecoder {
    /// Create a new auto-detecting decoder
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordDecoder for AutoDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Record>> {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Array(items)) => records_from_array(items),
            Ok(_) => Err(Error::malformed(
                "JSON document must contain an array of objects",
            )),
            Err(e) => {
                debug!("Detected line-delimited JSON format ({e})");
                self.lines.decode(body)
            }
        }
    }
}

/// Build the decoder for a dialect
pub fn decoder_for(dialect: InputDialect) -> Box<dyn RecordDecoder> {
    match dialect {
        InputDialect::Auto => Box::new(AutoDecoder::new()),
        InputDialect::Json => Box::new(JsonArrayDecoder::new()),
        InputDialect::Jsonl => Box::new(JsonlDecoder::new()),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
