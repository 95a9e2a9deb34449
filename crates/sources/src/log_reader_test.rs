//! Tests for LogReader

use super::*;
use std::io::{self, Cursor, Write};

use flate2::Compression as GzLevel;
use flate2::write::GzEncoder;
use lz4_flex::frame::FrameEncoder;
use serde_json::json;
use tempfile::TempDir;

const SAMPLE: &str = concat!(
    "{\"type\": \"login\", \"user\": \"alice\"}\n",
    "this is not json\n",
    "\n",
    "   \n",
    "{\"type\": \"logout\", \"user\": \"alice\"}\n",
);

fn expected_sample() -> Vec<Record> {
    vec![
        Record::structured(json!({"type": "login", "user": "alice"})),
        Record::raw("this is not json"),
        Record::structured(json!({"type": "logout", "user": "alice"})),
    ]
}

/// Reader that fails after yielding its prefix
struct FailingReader {
    prefix: Cursor<Vec<u8>>,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.prefix.read(buf)?;
        if n == 0 {
            return Err(io::Error::other("disk went away"));
        }
        Ok(n)
    }
}

#[test]
fn test_read_json_and_plain_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sample.log");
    std::fs::write(&path, SAMPLE).unwrap();

    let mut reader = LogReader::open(&path).unwrap();
    assert!(!reader.is_compressed());

    let records = reader.read_all().unwrap();
    assert_eq!(records, expected_sample());
    assert_eq!(reader.line_number(), 5);
}

#[test]
fn test_read_lz4_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sample.log.lz4");
    {
        let file = std::fs::File::create(&path).unwrap();
        let mut encoder = FrameEncoder::new(file);
        encoder.write_all(SAMPLE.as_bytes()).unwrap();
        encoder.finish().unwrap();
    }

    let reader = LogReader::open(&path).unwrap();
    assert!(reader.is_compressed());
    assert_eq!(reader.compression(), Compression::Lz4);

    let records: Vec<Record> = reader.records().collect::<Result<_>>().unwrap();
    assert_eq!(records, expected_sample());
}

#[test]
fn test_from_reader() {
    let reader = LogReader::from_reader(Cursor::new(SAMPLE.as_bytes().to_vec()));
    let records: Vec<Record> = reader.into_iter().collect::<Result<_>>().unwrap();
    assert_eq!(records, expected_sample());
}

#[test]
fn test_last_line_without_terminator() {
    let reader = LogReader::from_reader(Cursor::new(b"first\n{\"a\": 1}".to_vec()));
    let records: Vec<Record> = reader.records().collect::<Result<_>>().unwrap();
    assert_eq!(records, vec![Record::raw("first"), Record::structured(json!({"a": 1}))]);
}

#[test]
fn test_crlf_terminators() {
    let reader = LogReader::from_reader(Cursor::new(b"plain\r\n{\"a\": 1}\r\n".to_vec()));
    let records: Vec<Record> = reader.records().collect::<Result<_>>().unwrap();
    assert_eq!(records[0], Record::raw("plain"));
    assert_eq!(records[1], Record::structured(json!({"a": 1})));
}

#[test]
fn test_invalid_utf8_becomes_raw() {
    let reader = LogReader::from_reader(Cursor::new(b"bad \xff byte\n".to_vec()));
    let records: Vec<Record> = reader.records().collect::<Result<_>>().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].as_raw(), Some("bad \u{fffd} byte"));
}

#[test]
fn test_empty_input() {
    let mut reader = LogReader::from_reader(Cursor::new(Vec::new()));
    assert!(reader.read_record().unwrap().is_none());
}

#[test]
fn test_open_missing_file() {
    let err = LogReader::open("/nonexistent/audit.log").unwrap_err();
    assert!(matches!(err, SourceError::Open { .. }));
    assert!(err.to_string().contains("/nonexistent/audit.log"));
}

#[test]
fn test_iterator_stops_after_read_error() {
    let reader = LogReader::from_reader(FailingReader {
        prefix: Cursor::new(b"one\ntwo\n".to_vec()),
    });
    let items: Vec<_> = reader.records().collect();

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].as_ref().unwrap(), &Record::raw("one"));
    assert_eq!(items[1].as_ref().unwrap(), &Record::raw("two"));
    match &items[2] {
        Err(SourceError::Read { line, .. }) => assert_eq!(*line, 2),
        other => panic!("expected read error, got {:?}", other),
    }
}

#[test]
fn test_custom_buffer_size() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("small.log");
    std::fs::write(&path, SAMPLE).unwrap();

    let config = ReaderConfig {
        buffer_size: 8,
        ..ReaderConfig::default()
    };
    let records = LogReader::open_with(&path, &config)
        .unwrap()
        .read_all()
        .unwrap();
    assert_eq!(records, expected_sample());
}

fn lz4_bytes(text: &str) -> Vec<u8> {
    let mut encoder = FrameEncoder::new(Vec::new());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

fn gzip_bytes(text: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), GzLevel::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

#[test]
fn test_read_gzip_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("audit.log.gz");
    std::fs::write(&path, gzip_bytes(SAMPLE)).unwrap();

    let mut reader = LogReader::open(&path).unwrap();
    assert_eq!(reader.compression(), Compression::Gzip);
    assert_eq!(reader.read_all().unwrap(), expected_sample());
}

#[test]
fn test_read_every_gzip_member() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rotated.log.gz");
    let mut bytes = gzip_bytes("{\"n\": 1}\n");
    bytes.extend(gzip_bytes("{\"n\": 2}\n"));
    std::fs::write(&path, bytes).unwrap();

    let records = LogReader::open(&path).unwrap().read_all().unwrap();
    assert_eq!(
        records,
        vec![
            Record::structured(json!({"n": 1})),
            Record::structured(json!({"n": 2})),
        ]
    );
}

#[test]
fn test_read_every_lz4_frame() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("appended.log.lz4");
    let mut bytes = lz4_bytes("first\n");
    bytes.extend(lz4_bytes("second\n"));
    std::fs::write(&path, bytes).unwrap();

    let records = LogReader::open(&path).unwrap().read_all().unwrap();
    assert_eq!(records, vec![Record::raw("first"), Record::raw("second")]);
}

#[test]
fn test_detects_codec_by_magic() {
    let dir = TempDir::new().unwrap();
    let lz4_path = dir.path().join("out.jsonl");
    let gz_path = dir.path().join("out.log");
    std::fs::write(&lz4_path, lz4_bytes(SAMPLE)).unwrap();
    std::fs::write(&gz_path, gzip_bytes(SAMPLE)).unwrap();

    let mut reader = LogReader::open(&lz4_path).unwrap();
    assert_eq!(reader.compression(), Compression::Lz4);
    assert_eq!(reader.read_all().unwrap(), expected_sample());

    let mut reader = LogReader::open(&gz_path).unwrap();
    assert_eq!(reader.compression(), Compression::Gzip);
    assert_eq!(reader.read_all().unwrap(), expected_sample());
}

#[test]
fn test_explicit_compression_skips_detection() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("audit.log.lz4");
    std::fs::write(&path, "plain despite the name\n").unwrap();

    let config = ReaderConfig {
        compression: Compression::None,
        ..ReaderConfig::default()
    };
    let mut reader = LogReader::open_with(&path, &config).unwrap();
    assert!(!reader.is_compressed());
    assert_eq!(
        reader.read_all().unwrap(),
        vec![Record::raw("plain despite the name")]
    );
}

#[test]
fn test_plain_file_is_not_compressed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("audit.log");
    std::fs::write(&path, SAMPLE).unwrap();

    let reader = LogReader::open(&path).unwrap();
    assert_eq!(reader.compression(), Compression::None);
}
