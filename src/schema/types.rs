//! Schema types
//!
//! A schema is an ordered list of field descriptors. Each descriptor carries
//! a type tag, a mode tag and, for RECORD fields only, a nested schema.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// Column type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    Record,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "STRING"),
            FieldType::Integer => write!(f, "INTEGER"),
            FieldType::Float => write!(f, "FLOAT"),
            FieldType::Boolean => write!(f, "BOOLEAN"),
            FieldType::Record => write!(f, "RECORD"),
        }
    }
}

/// Whether a field holds one (possibly null) value or a list of values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldMode {
    Nullable,
    Repeated,
}

impl fmt::Display for FieldMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldMode::Nullable => write!(f, "NULLABLE"),
            FieldMode::Repeated => write!(f, "REPEATED"),
        }
    }
}

/// A single named field of a schema
///
/// Nested fields exist if and only if the type is [`FieldType::Record`];
/// the constructors are the only way to build a descriptor, which keeps
/// that pairing intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    name: String,
    #[serde(rename = "type")]
    field_type: FieldType,
    mode: FieldMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Schema>,
}

impl FieldDescriptor {
    /// Create a non-record field
    ///
    /// Passing [`FieldType::Record`] yields a record with no sub-fields.
    pub fn scalar(name: impl Into<String>, field_type: FieldType, mode: FieldMode) -> Self {
        let fields = (field_type == FieldType::Record).then(Schema::default);
        Self {
            name: name.into(),
            field_type,
            mode,
            fields,
        }
    }

    /// Create a record field owning a nested schema
    pub fn record(name: impl Into<String>, mode: FieldMode, fields: Schema) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Record,
            mode,
            fields: Some(fields),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn mode(&self) -> FieldMode {
        self.mode
    }

    /// Nested schema, present only for RECORD fields
    pub fn fields(&self) -> Option<&Schema> {
        self.fields.as_ref()
    }

    pub fn is_repeated(&self) -> bool {
        self.mode == FieldMode::Repeated
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        writeln!(
            f,
            "{:indent$}{} {} {}",
            "",
            self.name,
            self.field_type,
            self.mode,
            indent = indent
        )?;
        if let Some(fields) = &self.fields {
            for field in fields {
                field.fmt_indented(f, indent + 2)?;
            }
        }
        Ok(())
    }
}

/// Ordered list of field descriptors, in first-seen key order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Create a schema from descriptors, keeping their order
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    /// Look up a top-level field by name
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Deepest RECORD nesting level; a flat schema has depth 1
    pub fn depth(&self) -> usize {
        1 + self
            .fields
            .iter()
            .filter_map(FieldDescriptor::fields)
            .map(Schema::depth)
            .max()
            .unwrap_or(0)
    }

    /// Canonical serialized form: compact JSON, field order as inferred
    pub fn canonical_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Convert to pretty JSON string
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Stable 64-bit content hash of the canonical form
    ///
    /// First eight bytes of the SHA-256 digest, big-endian.
    pub fn fingerprint(&self) -> u64 {
        let digest = Sha256::digest(self.canonical_json().as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(prefix)
    }

    /// Table identifier for this schema: `{base}_{fingerprint}`
    pub fn table_id(&self, base: &str) -> String {
        format!("{base}_{}", self.fingerprint())
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in &self.fields {
            field.fmt_indented(f, 0)?;
        }
        Ok(())
    }
}
