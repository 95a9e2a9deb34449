//! Shared fixtures and helper tests for commands

use super::*;
use std::path::PathBuf;

use tempfile::TempDir;
use vaudit_config::Compression;

/// Two complete transactions, one left open, and a line of noise
pub(crate) const SAMPLE_LOG: &str = r#"{"time":"2024-05-01T10:00:03Z","type":"request","auth":{"client_token":"hmac-sha256:aaa","entity_id":"ent-1"},"request":{"id":"r1","path":"secret/data/app","mount_type":"kv","namespace":{"path":"team/"}}}
{"time":"2024-05-01T10:00:01Z","type":"request","auth":{"client_token":"hmac-sha256:bbb"},"request":{"id":"r2","path":"sys/mounts"}}
not a json line
{"time":"2024-05-01T10:00:04Z","type":"response","auth":{"client_token":"hmac-sha256:aaa","entity_id":"ent-1"},"error":"1 error occurred:\n\t* permission denied","request":{"id":"r1","path":"secret/data/app","mount_type":"kv","namespace":{"path":"team/"}}}
{"time":"2024-05-01T10:00:02Z","type":"response","auth":{"client_token":"hmac-sha256:bbb"},"request":{"id":"r2","path":"sys/mounts"}}
{"time":"2024-05-01T10:00:00Z","type":"request","request":{"id":"r3","path":"auth/token/lookup-self"}}
"#;

/// Write the sample log into `dir`
pub(crate) fn sample_log(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("audit.log");
    std::fs::write(&path, SAMPLE_LOG).unwrap();
    path
}

/// Output lines of a command run
pub(crate) fn lines(out: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(out).lines().map(str::to_string).collect()
}

#[test]
fn test_read_records() {
    let dir = TempDir::new().unwrap();
    let path = sample_log(&dir);

    let records = read_records(&path, &Config::default()).unwrap();
    assert_eq!(records.len(), 6);
    assert_eq!(records[2], Record::raw("not a json line"));
}

#[test]
fn test_open_missing_input() {
    let err = open_reader(Path::new("/nonexistent/audit.log"), &Config::default()).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/audit.log"));
}

#[test]
fn test_writer_config_keeps_other_settings() {
    let mut config = Config::default();
    config.writer.time_key = "ts".to_string();
    config.writer.compression = Compression::Lz4;

    let writer = writer_config(&config, WriteMode::Truncate);
    assert_eq!(writer.mode, WriteMode::Truncate);
    assert_eq!(writer.time_key, "ts");
    assert_eq!(writer.compression, Compression::Lz4);
}

#[test]
fn test_final_types_from_config() {
    let mut config = Config::default();
    config.grouping.final_types = vec!["done".to_string()];
    let types = final_types(&config).unwrap();
    assert_eq!(types.types(), ["done"]);
}

#[test]
fn test_print_record() {
    let mut out = Vec::new();
    print_record(&mut out, &Record::raw("plain")).unwrap();
    print_record(
        &mut out,
        &Record::structured(serde_json::json!({"b": 1, "a": 2})),
    )
    .unwrap();
    assert_eq!(lines(&out), vec!["plain", "{\"b\":1,\"a\":2}"]);
}
