//! Schema inference module
//!
//! Infers a tabular schema from a list of JSON records.
//!
//! # Features
//!
//! - **Type Detection**: STRING, INTEGER, FLOAT, BOOLEAN and RECORD fields
//! - **Repetition**: arrays become REPEATED fields
//! - **Nested Records**: objects and arrays of objects recurse
//! - **Depth Limit**: deeply nested input fails instead of overflowing the stack
//! - **Fingerprinting**: stable content hash used to name tables

mod inference;
mod types;

pub use inference::{build_schema, detect_field, SchemaBuilder, DEFAULT_MAX_DEPTH};
pub use types::{FieldDescriptor, FieldMode, FieldType, Schema};

#[cfg(test)]
mod tests;
