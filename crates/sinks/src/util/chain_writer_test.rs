//! Tests for chain writers

use super::*;
use std::io::Read;

use flate2::read::GzDecoder;
use lz4_flex::frame::FrameDecoder;
use tempfile::NamedTempFile;

fn target(file: &NamedTempFile) -> Target {
    Box::new(file.reopen().unwrap())
}

#[test]
fn test_file_extensions() {
    assert_eq!(PlainTextWriter::default().file_extension(), ".jsonl");
    assert_eq!(Lz4Writer::default().file_extension(), ".jsonl.lz4");
    assert_eq!(GzipWriter::default().file_extension(), ".jsonl.gz");
}

#[test]
fn test_plaintext_finish_flushes() {
    let temp_file = NamedTempFile::new().unwrap();
    let mut chain = PlainTextWriter::new(4096).wrap(target(&temp_file)).unwrap();

    chain.write_all(b"hello world\n").unwrap();
    assert_eq!(chain.bytes_written(), 12);
    chain.finish().unwrap();

    let content = std::fs::read(temp_file.path()).unwrap();
    assert_eq!(content, b"hello world\n");
}

#[test]
fn test_lz4_round_trip() {
    let temp_file = NamedTempFile::new().unwrap();
    let mut chain = Lz4Writer::new(4096).wrap(target(&temp_file)).unwrap();

    for i in 0..100 {
        chain.write_all(format!("line {}\n", i).as_bytes()).unwrap();
    }
    chain.finish().unwrap();

    let compressed = std::fs::read(temp_file.path()).unwrap();
    let mut decoded = String::new();
    FrameDecoder::new(compressed.as_slice())
        .read_to_string(&mut decoded)
        .unwrap();

    assert!(decoded.starts_with("line 0\n"));
    assert!(decoded.ends_with("line 99\n"));
    assert_eq!(decoded.lines().count(), 100);
}

#[test]
fn test_lz4_compresses_repetitive_input() {
    let temp_file = NamedTempFile::new().unwrap();
    let mut chain = Lz4Writer::new(4096).wrap(target(&temp_file)).unwrap();

    let line = b"{\"type\":\"response\",\"request\":{\"id\":\"same\"}}\n";
    for _ in 0..1000 {
        chain.write_all(line).unwrap();
    }
    let uncompressed = chain.bytes_written();
    chain.finish().unwrap();

    let on_disk = std::fs::metadata(temp_file.path()).unwrap().len();
    assert_eq!(uncompressed, (line.len() * 1000) as u64);
    assert!(on_disk < uncompressed / 10);
}

#[test]
fn test_for_compression() {
    let writer = for_compression(Compression::Lz4, 1024);
    assert_eq!(writer.file_extension(), ".jsonl.lz4");

    let writer = for_compression(Compression::Gzip, 1024);
    assert_eq!(writer.file_extension(), ".jsonl.gz");

    let writer = for_compression(Compression::None, 1024);
    assert_eq!(writer.file_extension(), ".jsonl");

    let writer = for_compression(Compression::Auto, 1024);
    assert_eq!(writer.file_extension(), ".jsonl");
}

#[test]
fn test_gzip_round_trip() {
    let temp_file = NamedTempFile::new().unwrap();
    let mut chain = GzipWriter::new(4096).wrap(target(&temp_file)).unwrap();

    for i in 0..100 {
        chain.write_all(format!("line {}\n", i).as_bytes()).unwrap();
    }
    assert_eq!(chain.bytes_written(), 790);
    chain.finish().unwrap();

    let compressed = std::fs::read(temp_file.path()).unwrap();
    assert_eq!(&compressed[..2], &[0x1f, 0x8b]);

    let mut decoded = String::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_string(&mut decoded)
        .unwrap();
    assert!(decoded.starts_with("line 0\n"));
    assert!(decoded.ends_with("line 99\n"));
    assert_eq!(decoded.lines().count(), 100);
}

#[test]
fn test_gzip_level() {
    let temp_file = NamedTempFile::new().unwrap();
    let mut chain = GzipWriter::new(4096)
        .with_level(0)
        .wrap(target(&temp_file))
        .unwrap();
    chain.write_all(&[b'a'; 4096]).unwrap();
    chain.finish().unwrap();

    // Stored blocks do not shrink
    let on_disk = std::fs::metadata(temp_file.path()).unwrap().len();
    assert!(on_disk > 4096);
}
