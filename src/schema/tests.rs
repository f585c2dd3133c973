//! Schema inference tests

use super::*;
use crate::error::Error;
use crate::Record;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;

fn records(value: Value) -> Vec<Record> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| item.as_object().cloned().expect("test records are objects"))
            .collect(),
        other => panic!("expected an array, got {other}"),
    }
}

fn schema_json(input: Value) -> Value {
    let schema = build_schema(&records(input)).unwrap();
    serde_json::to_value(&schema).unwrap()
}

// ============================================================================
// Field Type Detector
// ============================================================================

#[test_case(json!("alice"), FieldType::String ; "string")]
#[test_case(json!(""), FieldType::String ; "empty string")]
#[test_case(json!(30), FieldType::Integer ; "integer")]
#[test_case(json!(-7), FieldType::Integer ; "negative integer")]
#[test_case(json!(u64::MAX), FieldType::Integer ; "unsigned integer")]
#[test_case(json!(1.5), FieldType::Float ; "float")]
#[test_case(json!(true), FieldType::Boolean ; "boolean true")]
#[test_case(json!(false), FieldType::Boolean ; "boolean false")]
#[test_case(Value::Null, FieldType::String ; "null falls back to string")]
fn test_detect_scalar(value: Value, expected: FieldType) {
    let field = detect_field("f", &value).unwrap();
    assert_eq!(field.name(), "f");
    assert_eq!(field.field_type(), expected);
    assert_eq!(field.mode(), FieldMode::Nullable);
    assert!(field.fields().is_none());
}

#[test]
fn test_boolean_is_never_integer() {
    for value in [json!(true), json!(false)] {
        let field = detect_field("flag", &value).unwrap();
        assert_ne!(field.field_type(), FieldType::Integer);
    }
}

#[test]
fn test_float_with_integral_value_stays_float() {
    let field = detect_field("price", &json!(2.0)).unwrap();
    assert_eq!(field.field_type(), FieldType::Float);
}

#[test]
fn test_detect_array_of_records() {
    let value = json!([{"id": 1, "sku": "a"}, {"id": 2}]);
    let field = detect_field("orders", &value).unwrap();

    assert_eq!(field.field_type(), FieldType::Record);
    assert_eq!(field.mode(), FieldMode::Repeated);

    let expected = build_schema(&records(value)).unwrap();
    assert_eq!(field.fields(), Some(&expected));
}

#[test_case(json!(["a", "b"]) ; "strings")]
#[test_case(json!([1, 2, 3]) ; "integers")]
#[test_case(json!([{"id": 1}, 2]) ; "records mixed with a scalar")]
#[test_case(json!([[1], [2]]) ; "nested arrays")]
#[test_case(json!([null]) ; "nulls")]
fn test_detect_non_record_array(value: Value) {
    let field = detect_field("tags", &value).unwrap();
    assert_eq!(field.field_type(), FieldType::String);
    assert_eq!(field.mode(), FieldMode::Repeated);
    assert!(field.fields().is_none());
}

#[test]
fn test_empty_array_is_repeated_string() {
    let field = detect_field("empty", &json!([])).unwrap();
    assert_eq!(field.field_type(), FieldType::String);
    assert_eq!(field.mode(), FieldMode::Repeated);
    assert!(field.fields().is_none());
}

#[test]
fn test_detect_single_record() {
    let value = json!({"city": "NYC", "zip": "10001"});
    let field = detect_field("address", &value).unwrap();

    assert_eq!(field.field_type(), FieldType::Record);
    assert_eq!(field.mode(), FieldMode::Nullable);

    let expected = build_schema(&records(json!([value]))).unwrap();
    assert_eq!(field.fields(), Some(&expected));
}

#[test]
fn test_empty_object_is_record_without_fields() {
    let field = detect_field("meta", &json!({})).unwrap();
    assert_eq!(field.field_type(), FieldType::Record);
    assert_eq!(field.fields().map(Schema::len), Some(0));
}

// ============================================================================
// Schema Builder
// ============================================================================

#[test]
fn test_empty_input_fails() {
    let err = build_schema(&[]).unwrap_err();
    assert!(matches!(err, Error::EmptyInput));
}

#[test]
fn test_scenario_flat_record() {
    assert_eq!(
        schema_json(json!([{"name": "alice", "age": 30}])),
        json!([
            {"name": "name", "type": "STRING", "mode": "NULLABLE"},
            {"name": "age", "type": "INTEGER", "mode": "NULLABLE"}
        ])
    );
}

#[test]
fn test_scenario_primitive_array() {
    assert_eq!(
        schema_json(json!([{"tags": ["a", "b"]}])),
        json!([{"name": "tags", "type": "STRING", "mode": "REPEATED"}])
    );
}

#[test]
fn test_scenario_nested_record() {
    assert_eq!(
        schema_json(json!([{"address": {"city": "NYC", "zip": "10001"}}])),
        json!([{
            "name": "address",
            "type": "RECORD",
            "mode": "NULLABLE",
            "fields": [
                {"name": "city", "type": "STRING", "mode": "NULLABLE"},
                {"name": "zip", "type": "STRING", "mode": "NULLABLE"}
            ]
        }])
    );
}

#[test]
fn test_scenario_repeated_record() {
    assert_eq!(
        schema_json(json!([{"orders": [{"id": 1}, {"id": 2}]}])),
        json!([{
            "name": "orders",
            "type": "RECORD",
            "mode": "REPEATED",
            "fields": [{"name": "id", "type": "INTEGER", "mode": "NULLABLE"}]
        }])
    );
}

#[test]
fn test_preserves_key_order() {
    let schema = build_schema(&records(json!([{"zeta": 1, "alpha": 2, "mid": 3}]))).unwrap();
    let names: Vec<&str> = schema.iter().map(FieldDescriptor::name).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_only_first_record_is_inspected() {
    let input = records(json!([
        {"id": 1},
        {"id": "two", "extra": true}
    ]));
    let schema = build_schema(&input).unwrap();

    assert_eq!(schema.len(), 1);
    assert_eq!(schema.get("id").unwrap().field_type(), FieldType::Integer);
    assert!(schema.get("extra").is_none());
}

#[test]
fn test_repeated_record_uses_first_element() {
    let schema = build_schema(&records(json!([
        {"items": [{"a": 1}, {"a": 1, "b": 2}]}
    ])))
    .unwrap();

    let nested = schema.get("items").unwrap().fields().unwrap();
    assert_eq!(nested.len(), 1);
    assert!(nested.get("b").is_none());
}

#[test]
fn test_build_is_deterministic() {
    let input = records(json!([{
        "user": {"name": "x", "tags": ["a"]},
        "events": [{"kind": "click", "at": 1.5}],
        "ok": true
    }]));

    let first = build_schema(&input).unwrap();
    let second = build_schema(&input).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.canonical_json(), second.canonical_json());
}

#[test]
fn test_fields_present_only_for_records() {
    let schema = build_schema(&records(json!([{
        "s": "x",
        "n": null,
        "list": [1],
        "obj": {"k": 1},
        "objs": [{"k": 1}]
    }])))
    .unwrap();

    for field in &schema {
        assert_eq!(
            field.fields().is_some(),
            field.field_type() == FieldType::Record,
            "field {}",
            field.name()
        );
    }
}

// ============================================================================
// Depth limit
// ============================================================================

#[test]
fn test_depth_within_limit() {
    let input = records(json!([{"a": {"b": {"c": 1}}}]));
    let schema = SchemaBuilder::new().with_max_depth(3).build(&input).unwrap();
    assert_eq!(schema.depth(), 3);
}

#[test]
fn test_depth_exceeded_names_field_path() {
    let input = records(json!([{"a": {"b": {"c": 1}}}]));
    let err = SchemaBuilder::new().with_max_depth(2).build(&input).unwrap_err();

    match err {
        Error::DepthExceeded { field, max_depth } => {
            assert_eq!(field, "a.b.c");
            assert_eq!(max_depth, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_depth_counts_repeated_records() {
    let input = records(json!([{"orders": [{"lines": [{"sku": "x"}]}]}]));
    let err = SchemaBuilder::new().with_max_depth(2).build(&input).unwrap_err();
    assert!(matches!(err, Error::DepthExceeded { ref field, .. } if field == "orders.lines.sku"));
}

#[test]
fn test_pathological_nesting_fails_cleanly() {
    let mut value = json!(1);
    for _ in 0..100 {
        value = json!({ "n": value });
    }
    let input = records(json!([{ "root": value }]));

    let err = build_schema(&input).unwrap_err();
    assert!(matches!(err, Error::DepthExceeded { max_depth, .. } if max_depth == DEFAULT_MAX_DEPTH));
}

#[test]
fn test_detect_respects_depth() {
    let builder = SchemaBuilder::new().with_max_depth(1);
    assert!(builder.detect("flat", &json!(1)).is_ok());
    assert!(builder.detect("nested", &json!({"x": 1})).is_err());
}

// ============================================================================
// Fingerprint & rendering
// ============================================================================

#[test]
fn test_fingerprint_is_stable() {
    let a = build_schema(&records(json!([{"name": "alice", "age": 30}]))).unwrap();
    let b = build_schema(&records(json!([{"name": "bob", "age": 41}]))).unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(a.table_id("events"), b.table_id("events"));
}

#[test]
fn test_fingerprint_depends_on_types_and_order() {
    let base = build_schema(&records(json!([{"name": "alice", "age": 30}]))).unwrap();
    let retyped = build_schema(&records(json!([{"name": "alice", "age": 30.5}]))).unwrap();
    let reordered = build_schema(&records(json!([{"age": 30, "name": "alice"}]))).unwrap();

    assert_ne!(base.fingerprint(), retyped.fingerprint());
    assert_ne!(base.fingerprint(), reordered.fingerprint());
}

#[test]
fn test_table_id_shape() {
    let schema = build_schema(&records(json!([{"id": 1}]))).unwrap();
    let table_id = schema.table_id("uploads");

    let suffix = table_id.strip_prefix("uploads_").unwrap();
    assert!(!suffix.is_empty());
    assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(suffix.parse::<u64>().unwrap(), schema.fingerprint());
}

#[test]
fn test_canonical_json_is_compact() {
    let schema = build_schema(&records(json!([{"id": 1}]))).unwrap();
    assert_eq!(
        schema.canonical_json(),
        r#"[{"name":"id","type":"INTEGER","mode":"NULLABLE"}]"#
    );
}

#[test]
fn test_display_tree() {
    let schema = build_schema(&records(json!([{
        "id": 1,
        "address": {"city": "NYC"}
    }])))
    .unwrap();

    assert_eq!(
        schema.to_string(),
        "id INTEGER NULLABLE\naddress RECORD NULLABLE\n  city STRING NULLABLE\n"
    );
}
