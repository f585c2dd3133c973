//! Schema inference from JSON records
//!
//! Only the first record is inspected. Every key of that record becomes one
//! field, typed from its value; objects and arrays of objects recurse.

use super::types::{FieldDescriptor, FieldMode, FieldType, Schema};
use crate::error::{Error, Result};
use crate::Record;
use serde_json::Value;

/// Default maximum nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Schema builder with a nesting limit
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    /// Maximum depth for nested records (top-level fields are depth 1)
    max_depth: usize,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set maximum depth for nested records
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Build a schema from the first of `records`
    pub fn build(&self, records: &[Record]) -> Result<Schema> {
        let sample = records.first().ok_or(Error::EmptyInput)?;
        self.build_from_sample(sample, &mut Vec::new())
    }

    /// Classify a single value
    pub fn detect(&self, key: &str, value: &Value) -> Result<FieldDescriptor> {
        self.detect_at(key, value, &mut vec![key])
    }

    fn build_from_sample<'a>(&self, sample: &'a Record, path: &mut Vec<&'a str>) -> Result<Schema> {
        let mut fields = Vec::with_capacity(sample.len());
        for (key, value) in sample {
            path.push(key);
            let field = self.detect_at(key, value, path);
            path.pop();
            fields.push(field?);
        }
        Ok(Schema::new(fields))
    }

    /// `path` ends with `key` and its length is the depth of the field
    fn detect_at<'a>(
        &self,
        key: &str,
        value: &'a Value,
        path: &mut Vec<&'a str>,
    ) -> Result<FieldDescriptor> {
        if path.len() > self.max_depth {
            return Err(Error::DepthExceeded {
                field: path.join("."),
                max_depth: self.max_depth,
            });
        }

        let field = match value {
            Value::String(_) => FieldDescriptor::scalar(key, FieldType::String, FieldMode::Nullable),
            Value::Number(n) if n.is_i64() || n.is_u64() => {
                FieldDescriptor::scalar(key, FieldType::Integer, FieldMode::Nullable)
            }
            Value::Number(_) => FieldDescriptor::scalar(key, FieldType::Float, FieldMode::Nullable),
            Value::Bool(_) => FieldDescriptor::scalar(key, FieldType::Boolean, FieldMode::Nullable),
            Value::Array(items) => match record_sample(items) {
                Some(sample) => FieldDescriptor::record(
                    key,
                    FieldMode::Repeated,
                    self.build_from_sample(sample, path)?,
                ),
                // Primitive and mixed arrays are not inspected element by element
                None => FieldDescriptor::scalar(key, FieldType::String, FieldMode::Repeated),
            },
            Value::Object(map) => {
                FieldDescriptor::record(key, FieldMode::Nullable, self.build_from_sample(map, path)?)
            }
            Value::Null => FieldDescriptor::scalar(key, FieldType::String, FieldMode::Nullable),
        };

        Ok(field)
    }
}

/// First element of a non-empty array made only of objects
///
/// An empty array yields `None`: a record with no sub-fields cannot become a
/// column, so empty arrays are typed as repeated strings.
fn record_sample(items: &[Value]) -> Option<&Record> {
    if items.iter().all(Value::is_object) {
        items.first().and_then(Value::as_object)
    } else {
        None
    }
}

/// Build a schema with the default builder
pub fn build_schema(records: &[Record]) -> Result<Schema> {
    SchemaBuilder::new().build(records)
}

/// Classify one value with the default builder
pub fn detect_field(key: &str, value: &Value) -> Result<FieldDescriptor> {
    SchemaBuilder::new().detect(key, value)
}
