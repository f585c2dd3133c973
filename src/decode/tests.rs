//! Tests for decoder module

use super::*;
use crate::error::Error;
use test_case::test_case;

// ============================================================================
// InputDialect Tests
// ============================================================================

#[test]
fn test_input_dialect_default() {
    assert_eq!(InputDialect::default(), InputDialect::Auto);
}

#[test_case("auto", InputDialect::Auto)]
#[test_case("JSON", InputDialect::Json)]
#[test_case("array", InputDialect::Json)]
#[test_case("jsonl", InputDialect::Jsonl)]
#[test_case(" ndjson ", InputDialect::Jsonl)]
fn test_input_dialect_from_str(text: &str, expected: InputDialect) {
    assert_eq!(text.parse::<InputDialect>().unwrap(), expected);
}

#[test]
fn test_input_dialect_unknown() {
    let err = "csv".parse::<InputDialect>().unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { .. }));
}

// ============================================================================
// JSON Array Decoder Tests
// ============================================================================

#[test]
fn test_json_array_decoder() {
    let decoder = JsonArrayDecoder::new();
    let body = r#"[{"id": 1}, {"id": 2}, {"id": 3}]"#;

    let records = decoder.decode(body).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["id"], 1);
    assert_eq!(records[2]["id"], 3);
}

#[test]
fn test_json_array_decoder_rejects_object() {
    let decoder = JsonArrayDecoder::new();
    let err = decoder.decode(r#"{"id": 1}"#).unwrap_err();
    assert!(err.to_string().contains("must contain an array"));
}

#[test]
fn test_json_array_decoder_rejects_scalar_element() {
    let decoder = JsonArrayDecoder::new();
    let err = decoder.decode(r#"[{"id": 1}, 2]"#).unwrap_err();
    assert!(matches!(err, Error::MalformedInput { .. }));
    assert!(err.to_string().contains("Array element 1 is a number"));
}

#[test]
fn test_json_array_decoder_invalid() {
    let decoder = JsonArrayDecoder::new();
    assert!(decoder.decode("[{").is_err());
}

#[test]
fn test_json_array_decoder_keeps_key_order() {
    let decoder = JsonArrayDecoder::new();
    let records = decoder.decode(r#"[{"b": 1, "a": 2, "c": 3}]"#).unwrap();
    let keys: Vec<&String> = records[0].keys().collect();
    assert_eq!(keys, ["b", "a", "c"]);
}

// ============================================================================
// JSONL Decoder Tests
// ============================================================================

#[test]
fn test_jsonl_decoder() {
    let decoder = JsonlDecoder::new();
    let body = "{\"id\": 1}\n\n   \n{\"id\": 2}\n";

    let records = decoder.decode(body).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["id"], 2);
}

#[test]
fn test_jsonl_decoder_crlf() {
    let decoder = JsonlDecoder::new();
    let records = decoder.decode("{\"id\": 1}\r\n{\"id\": 2}\r\n").unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn test_jsonl_decoder_bare_carriage_returns() {
    let decoder = JsonlDecoder::new();
    let records = decoder.decode("{\"a\": 1}\r{\"a\": 2}\r").unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["a"], 2);
}

#[test]
fn test_jsonl_decoder_crlf_keeps_line_numbers() {
    let decoder = JsonlDecoder::new();
    let err = decoder.decode("{\"id\": 1}\r\n{\"id\": \r\n").unwrap_err();
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn test_auto_decoder_bare_carriage_returns() {
    let decoder = AutoDecoder::new();
    assert_eq!(decoder.decode("{\"a\": 1}\r{\"a\": 2}\r").unwrap().len(), 2);
}

#[test]
fn test_jsonl_decoder_reports_line() {
    let decoder = JsonlDecoder::new();
    let err = decoder.decode("{\"id\": 1}\n\n{\"id\": \n").unwrap_err();
    assert!(matches!(err, Error::MalformedInput { .. }));
    assert!(err.to_string().contains("line 3"));
}

#[test]
fn test_jsonl_decoder_rejects_non_object_line() {
    let decoder = JsonlDecoder::new();
    let err = decoder.decode("{\"id\": 1}\n[1, 2]\n").unwrap_err();
    assert!(err.to_string().contains("line 2 is an array"));
}

#[test]
fn test_jsonl_decoder_empty() {
    let decoder = JsonlDecoder::new();
    assert!(decoder.decode("\n \n").unwrap().is_empty());
}

// ============================================================================
// Auto Decoder Tests
// ============================================================================

#[test]
fn test_auto_decoder_array() {
    let decoder = AutoDecoder::new();
    let records = decoder.decode("[\n  {\"id\": 1},\n  {\"id\": 2}\n]").unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn test_auto_decoder_falls_back_to_lines() {
    let decoder = AutoDecoder::new();
    let body = "{\"name\": \"alice\", \"age\": 30}\n{\"name\": \"bob\", \"age\": 41}\n";

    let records = decoder.decode(body).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["name"], "alice");
    assert_eq!(records[1]["name"], "bob");
}

#[test_case("{\"id\": 7}" ; "single object")]
#[test_case("{\"id\": 7}\n" ; "single object line")]
#[test_case("42" ; "scalar")]
fn test_auto_decoder_valid_non_array_is_error(body: &str) {
    let decoder = AutoDecoder::new();
    let err = decoder.decode(body).unwrap_err();
    assert!(matches!(err, Error::MalformedInput { .. }));
    assert!(err.to_string().contains("must contain an array of objects"));
}

#[test]
fn test_auto_decoder_bad_line_after_fallback() {
    let decoder = AutoDecoder::new();
    let err = decoder.decode("{\"id\": 1}\nnot json\n").unwrap_err();
    assert!(matches!(err, Error::MalformedInput { .. }));
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn test_auto_decoder_array_of_scalars_is_error() {
    let decoder = AutoDecoder::new();
    let err = decoder.decode("[1, 2, 3]").unwrap_err();
    assert!(matches!(err, Error::MalformedInput { .. }));
}

#[test]
fn test_auto_decoder_empty_array() {
    let decoder = AutoDecoder::new();
    assert!(decoder.decode("[]").unwrap().is_empty());
}

#[test]
fn test_auto_decoder_pretty_printed_object_is_error() {
    let decoder = AutoDecoder::new();
    assert!(decoder.decode("{\n  \"id\": 1\n}\n").is_err());
}

// ============================================================================
// Bytes & factory
// ============================================================================

#[test]
fn test_decode_bytes_strips_bom() {
    let decoder = AutoDecoder::new();
    let body = "\u{feff}[{\"id\": 1}]".as_bytes();
    assert_eq!(decoder.decode_bytes(body).unwrap().len(), 1);
}

#[test]
fn test_decode_bytes_invalid_utf8() {
    let decoder = AutoDecoder::new();
    let err = decoder.decode_bytes(&[0xff, 0xfe, 0x00]).unwrap_err();
    assert!(err.to_string().contains("UTF-8"));
}

#[test]
fn test_decoder_for_dialect() {
    let body = "{\"id\": 1}\n{\"id\": 2}";
    assert_eq!(decoder_for(InputDialect::Auto).decode(body).unwrap().len(), 2);
    assert_eq!(decoder_for(InputDialect::Jsonl).decode(body).unwrap().len(), 2);
    assert!(decoder_for(InputDialect::Json).decode(body).is_err());
}
