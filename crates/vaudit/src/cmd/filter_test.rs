//! Tests for the filter command

use super::*;
use crate::cmd::tests::{lines, sample_log};
use serde_json::json;
use tempfile::TempDir;
use vaudit_sources::LogReader;

fn criterion() -> CriterionArgs {
    CriterionArgs {
        equals: None,
        regex: None,
        present: false,
        absent: false,
    }
}

fn args(input: PathBuf, key: &str, criterion: CriterionArgs) -> FilterArgs {
    FilterArgs {
        input,
        key: key.to_string(),
        criterion,
        transactions: false,
        out: None,
    }
}

#[test]
fn test_parse_literal() {
    assert_eq!(parse_literal("403"), json!(403));
    assert_eq!(parse_literal("true"), json!(true));
    assert_eq!(parse_literal("\"quoted\""), json!("quoted"));
    assert_eq!(parse_literal("hmac-sha256:abc"), json!("hmac-sha256:abc"));
    assert_eq!(parse_literal("null"), Value::Null);
}

#[test]
fn test_build_filter() {
    let present = build_filter("error", &CriterionArgs { present: true, ..criterion() }).unwrap();
    assert_eq!(present.key(), "error");

    let err = build_filter("error", &CriterionArgs { regex: Some("(".into()), ..criterion() });
    assert!(err.is_err());
}

#[test]
fn test_print_matching_events() {
    let dir = TempDir::new().unwrap();
    let args = args(
        sample_log(&dir),
        "error",
        CriterionArgs { present: true, ..criterion() },
    );

    let mut out = Vec::new();
    execute(&args, &Config::default(), &mut out).unwrap();
    let lines = lines(&out);

    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("permission denied"));
}

#[test]
fn test_absent_includes_raw_records() {
    let dir = TempDir::new().unwrap();
    let args = args(
        sample_log(&dir),
        "auth.entity_id",
        CriterionArgs { absent: true, ..criterion() },
    );

    let mut out = Vec::new();
    execute(&args, &Config::default(), &mut out).unwrap();
    let lines = lines(&out);

    assert_eq!(lines.len(), 4);
    assert!(lines.contains(&"not a json line".to_string()));
}

#[test]
fn test_print_matching_transactions() {
    let dir = TempDir::new().unwrap();
    let mut args = args(
        sample_log(&dir),
        "error",
        CriterionArgs { regex: Some("permission".into()), ..criterion() },
    );
    args.transactions = true;

    let mut out = Vec::new();
    execute(&args, &Config::default(), &mut out).unwrap();
    let lines = lines(&out);

    // Header plus only the records that matched
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Transaction r1:");
    assert!(lines[1].contains("\"type\":\"response\""));
}

#[test]
fn test_write_matching_transactions() {
    let dir = TempDir::new().unwrap();
    let dst = dir.path().join("token.log");
    let mut args = args(
        sample_log(&dir),
        "auth.client_token",
        CriterionArgs { equals: Some("hmac-sha256:bbb".into()), ..criterion() },
    );
    args.transactions = true;
    args.out = Some(dst.clone());

    let mut out = Vec::new();
    execute(&args, &Config::default(), &mut out).unwrap();
    assert_eq!(
        lines(&out),
        vec![format!("Wrote 1 matching transactions to {}", dst.display())]
    );

    let written = LogReader::open(&dst).unwrap().read_all().unwrap();
    assert_eq!(written.len(), 2);
    assert!(written.iter().all(|r| r.correlation_id() == Some("r2")));
    assert_eq!(
        written[0].field("time"),
        Some(&json!("2024-05-01T10:00:01Z"))
    );
}

#[test]
fn test_write_matching_events() {
    let dir = TempDir::new().unwrap();
    let dst = dir.path().join("kv.log");
    let mut args = args(
        sample_log(&dir),
        "request.mount_type",
        CriterionArgs { equals: Some("kv".into()), ..criterion() },
    );
    args.out = Some(dst.clone());

    let mut out = Vec::new();
    execute(&args, &Config::default(), &mut out).unwrap();
    assert_eq!(
        lines(&out),
        vec![format!("Wrote 2 matching events to {}", dst.display())]
    );
    assert_eq!(LogReader::open(&dst).unwrap().read_all().unwrap().len(), 2);
}
