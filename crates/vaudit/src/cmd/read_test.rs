//! Tests for the read command

use super::*;
use crate::cmd::tests::{lines, sample_log};
use tempfile::TempDir;

#[test]
fn test_read_prints_every_record() {
    let dir = TempDir::new().unwrap();
    let args = ReadArgs {
        input: sample_log(&dir),
    };

    let mut out = Vec::new();
    execute(&args, &Config::default(), &mut out).unwrap();

    let lines = lines(&out);
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[2], "not a json line");
    assert!(lines[0].starts_with("{\"time\":\"2024-05-01T10:00:03Z\",\"type\":\"request\""));
}
