//! Tests for the line codec

use crate::{Record, decode_line, encode_line};
use serde_json::json;

fn encode(record: &Record) -> String {
    let mut buf = Vec::new();
    encode_line(record, &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

// =============================================================================
// decode_line tests
// =============================================================================

#[test]
fn test_decode_json_object() {
    let record = decode_line(r#"{"type": "login", "user": "alice"}"#).unwrap();
    assert_eq!(record, Record::structured(json!({"type": "login", "user": "alice"})));
}

#[test]
fn test_decode_json_scalar_is_structured() {
    assert_eq!(decode_line("42").unwrap(), Record::structured(json!(42)));
    assert_eq!(decode_line("[1, 2]").unwrap(), Record::structured(json!([1, 2])));
}

#[test]
fn test_decode_plain_text_is_raw() {
    let record = decode_line("this is not json").unwrap();
    assert_eq!(record, Record::raw("this is not json"));
}

#[test]
fn test_decode_trims_whitespace_and_terminator() {
    let record = decode_line("  plain line \r\n").unwrap();
    assert_eq!(record.as_raw(), Some("plain line"));
}

#[test]
fn test_decode_blank_lines_skipped() {
    assert!(decode_line("").is_none());
    assert!(decode_line("   \n").is_none());
}

#[test]
fn test_decode_truncated_json_is_raw() {
    let record = decode_line(r#"{"request": {"id": "a""#).unwrap();
    assert!(!record.is_structured());
}

// =============================================================================
// encode_line tests
// =============================================================================

#[test]
fn test_encode_structured_compact() {
    let line = encode(&Record::structured(json!({"a": 1, "b": "x"})));
    assert_eq!(line, "{\"a\":1,\"b\":\"x\"}\n");
}

#[test]
fn test_encode_preserves_key_order() {
    let record = decode_line(r#"{"zeta": 1, "alpha": 2, "mid": {"y": 1, "x": 2}}"#).unwrap();
    let line = encode(&record);
    assert_eq!(line, "{\"zeta\":1,\"alpha\":2,\"mid\":{\"y\":1,\"x\":2}}\n");
}

#[test]
fn test_encode_raw_verbatim() {
    assert_eq!(encode(&Record::raw("plain line")), "plain line\n");
}

#[test]
fn test_encode_raw_single_terminator() {
    assert_eq!(encode(&Record::raw("already terminated\n")), "already terminated\n");
    assert_eq!(encode(&Record::raw("crlf\r\n\n")), "crlf\n");
}

#[test]
fn test_round_trip_structured() {
    let original = Record::structured(json!({
        "time": "2024-01-01T00:00:00Z",
        "request": {"id": "abc", "path": "secret/data"},
        "nested": [1, {"k": null}],
    }));
    let decoded = decode_line(&encode(&original)).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn test_round_trip_raw() {
    let original = Record::raw("vault: audit device enabled");
    let decoded = decode_line(&encode(&original)).unwrap();
    assert_eq!(decoded, original);
}
