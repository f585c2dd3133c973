//! SQL generation for DuckDB
//!
//! Maps schema fields to column types and renders JSON rows as typed
//! literals. Every rendered value is wrapped in a `CAST` to its column type
//! so that struct and list literals never depend on DuckDB's type unification.

use super::types::TableRef;
use crate::error::{Error, Result};
use crate::schema::{FieldDescriptor, FieldType, Schema};
use crate::Record;
use serde_json::Value;

type RenderResult = std::result::Result<String, String>;

/// Quote an identifier
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a string literal
pub fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// `"dataset"."table"`
pub fn qualified_name(table: &TableRef) -> String {
    format!("{}.{}", quote_ident(&table.dataset), quote_ident(&table.table))
}

/// Column type of a field, including the list suffix for REPEATED fields
pub fn column_type(field: &FieldDescriptor) -> RenderResult {
    let element = element_type(field)?;
    Ok(if field.is_repeated() {
        format!("{element}[]")
    } else {
        element
    })
}

/// Type of a single value of the field
fn element_type(field: &FieldDescriptor) -> RenderResult {
    let ty = match field.field_type() {
        FieldType::String => "VARCHAR".to_string(),
        FieldType::Integer => "BIGINT".to_string(),
        FieldType::Float => "DOUBLE".to_string(),
        FieldType::Boolean => "BOOLEAN".to_string(),
        FieldType::Record => {
            let fields = field
                .fields()
                .filter(|fields| !fields.is_empty())
                .ok_or_else(|| format!("RECORD field '{}' has no sub-fields", field.name()))?;
            let members = fields
                .iter()
                .map(|sub| -> RenderResult {
                    Ok(format!("{} {}", quote_ident(sub.name()), column_type(sub)?))
                })
                .collect::<std::result::Result<Vec<_>, String>>()?;
            format!("STRUCT({})", members.join(", "))
        }
    };
    Ok(ty)
}

/// `CREATE TABLE IF NOT EXISTS` statement for a schema
pub fn create_table_sql(table: &TableRef, schema: &Schema) -> Result<String> {
    if schema.is_empty() {
        return Err(Error::provision(table.to_string(), "schema has no fields"));
    }

    let columns = schema
        .iter()
        .map(|field| {
            column_type(field).map(|ty| format!("{} {ty}", quote_ident(field.name())))
        })
        .collect::<std::result::Result<Vec<_>, String>>()
        .map_err(|message| Error::provision(table.to_string(), message))?;

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        qualified_name(table),
        columns.join(", ")
    ))
}

/// `INSERT` statement for one row, or the reason the row is rejected
pub fn insert_row_sql(table: &TableRef, schema: &Schema, row: &Record) -> RenderResult {
    reject_unknown_keys(schema, row, "")?;

    let values = schema
        .iter()
        .map(|field| render_value(field, row.get(field.name()), field.name()))
        .collect::<std::result::Result<Vec<_>, String>>()?;

    Ok(format!(
        "INSERT INTO {} VALUES ({})",
        qualified_name(table),
        values.join(", ")
    ))
}

fn reject_unknown_keys(schema: &Schema, record: &Record, prefix: &str) -> std::result::Result<(), String> {
    match record.keys().find(|key| schema.get(key).is_none()) {
        Some(key) => Err(format!("no such field: {prefix}{key}")),
        None => Ok(()),
    }
}

fn render_value(field: &FieldDescriptor, value: Option<&Value>, path: &str) -> RenderResult {
    let ty = column_type(field)?;
    let raw = match value {
        None | Some(Value::Null) => "NULL".to_string(),
        Some(Value::Array(items)) if field.is_repeated() => render_list(field, items, path)?,
        Some(other) if field.is_repeated() => {
            return Err(format!("{path}: expected an array, got {other}"));
        }
        Some(other) => render_single(field, other, path)?,
    };
    Ok(format!("CAST({raw} AS {ty})"))
}

fn render_list(field: &FieldDescriptor, items: &[Value], path: &str) -> RenderResult {
    let ty = element_type(field)?;
    let elements = items
        .iter()
        .enumerate()
        .map(|(i, item)| -> RenderResult {
            let path = format!("{path}[{i}]");
            let raw = match (field.field_type(), item) {
                (_, Value::Null) => "NULL".to_string(),
                (FieldType::String, other) => quote_literal(&coerce_text(other)),
                _ => render_single(field, item, &path)?,
            };
            Ok(format!("CAST({raw} AS {ty})"))
        })
        .collect::<std::result::Result<Vec<_>, String>>()?;
    Ok(format!("[{}]", elements.join(", ")))
}

/// Render one non-null, non-list value
fn render_single(field: &FieldDescriptor, value: &Value, path: &str) -> RenderResult {
    match (field.field_type(), value) {
        (FieldType::Record, Value::Object(map)) => {
            let fields = field
                .fields()
                .ok_or_else(|| format!("RECORD field '{}' has no sub-fields", field.name()))?;
            render_struct(fields, map, path)
        }
        (FieldType::Record, other) => Err(format!("{path}: expected an object, got {other}")),
        (ty, other) => render_scalar(ty, other, path),
    }
}

fn render_struct(schema: &Schema, map: &Record, path: &str) -> RenderResult {
    reject_unknown_keys(schema, map, &format!("{path}."))?;
    let members = schema
        .iter()
        .map(|sub| -> RenderResult {
            let sub_path = format!("{path}.{}", sub.name());
            let value = render_value(sub, map.get(sub.name()), &sub_path)?;
            Ok(format!("{}: {value}", quote_literal(sub.name())))
        })
        .collect::<std::result::Result<Vec<_>, String>>()?;
    Ok(format!("{{{}}}", members.join(", ")))
}

fn render_scalar(ty: FieldType, value: &Value, path: &str) -> RenderResult {
    match (ty, value) {
        (FieldType::String, Value::String(s)) => Ok(quote_literal(s)),
        (FieldType::String, Value::Number(_) | Value::Bool(_)) => {
            Ok(quote_literal(&coerce_text(value)))
        }

        (FieldType::Integer, Value::Number(n)) => match n.as_i64() {
            Some(i) => Ok(i.to_string()),
            None if n.is_u64() => Err(format!("{path}: {n} is out of range for INTEGER")),
            None => Err(format!("{path}: expected an integer, got {n}")),
        },
        (FieldType::Integer, Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(|i| i.to_string())
            .map_err(|_| format!("{path}: cannot convert {value} to INTEGER")),

        (FieldType::Float, Value::Number(n)) => n
            .as_f64()
            .map(|f| format!("{f:?}"))
            .ok_or_else(|| format!("{path}: cannot convert {n} to FLOAT")),
        (FieldType::Float, Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(format!("{f:?}")),
            _ => Err(format!("{path}: cannot convert {value} to FLOAT")),
        },

        (FieldType::Boolean, Value::Bool(b)) => Ok(if *b { "TRUE" } else { "FALSE" }.to_string()),
        (FieldType::Boolean, Value::String(s)) if s.eq_ignore_ascii_case("true") => {
            Ok("TRUE".to_string())
        }
        (FieldType::Boolean, Value::String(s)) if s.eq_ignore_ascii_case("false") => {
            Ok("FALSE".to_string())
        }

        (ty, other) => Err(format!("{path}: cannot convert {other} to {ty}")),
    }
}

/// Text form used for values stored in STRING lists
fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
