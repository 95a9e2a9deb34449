//! Chain writers for different output formats
//!
//! A chain wraps an output target with buffering and optional
//! compression. `LogWriter` picks one per output based on its path and
//! configuration.
//!
//! # Available Writers
//!
//! - `PlainTextWriter` - Buffered text output (no compression)
//! - `Lz4Writer` - LZ4 frame compressed output
//! - `GzipWriter` - gzip compressed output
//!
//! # Example
//!
//! ```ignore
//! use vaudit_sinks::util::chain_writer::{ChainWriter, PlainTextWriter};
//!
//! let file = File::create("out.jsonl")?;
//! let mut chain = PlainTextWriter::new(64 * 1024).wrap(Box::new(file))?;
//! chain.write_all(b"{}\n")?;
//! chain.finish()?;
//! ```

use std::io::{self, BufWriter, Write};

use flate2::Compression as GzLevel;
use flate2::write::GzEncoder;
use lz4_flex::frame::FrameEncoder;
use vaudit_config::{Compression, DEFAULT_WRITE_BUFFER_SIZE};

#[cfg(test)]
#[path = "chain_writer_test.rs"]
mod tests;

/// Boxed output target
pub type Target = Box<dyn Write + Send>;

/// Trait for pluggable chain writers
pub trait ChainWriter: Send + Sync {
    /// Wrap an output target with this writer's buffering/compression
    fn wrap(&self, target: Target) -> io::Result<Box<dyn ChainWrite>>;

    /// File extension conventionally used for this format
    fn file_extension(&self) -> &'static str;
}

/// Trait for the actual write operations
///
/// This is object-safe and can be used with `Box<dyn ChainWrite>`.
pub trait ChainWrite: Write + Send {
    /// Finish writing (finalizes compression) and flush the target
    fn finish(self: Box<Self>) -> io::Result<()>;

    /// Bytes accepted so far, before compression
    fn bytes_written(&self) -> u64;
}

/// Pick a chain writer for a codec
///
/// Resolve `Auto` against the output path first; unresolved it means plain.
pub fn for_compression(compression: Compression, buffer_size: usize) -> Box<dyn ChainWriter> {
    match compression {
        Compression::Lz4 => Box::new(Lz4Writer::new(buffer_size)),
        Compression::Gzip => Box::new(GzipWriter::new(buffer_size)),
        Compression::None | Compression::Auto => Box::new(PlainTextWriter::new(buffer_size)),
    }
}

// ============================================================================
// PlainTextWriter - Buffered text output
// ============================================================================

/// Plain text writer with buffering (no compression)
#[derive(Debug, Clone)]
pub struct PlainTextWriter {
    buffer_size: usize,
}

impl PlainTextWriter {
    /// Create a new plain text writer with the specified buffer size
    pub fn new(buffer_size: usize) -> Self {
        Self { buffer_size }
    }
}

impl Default for PlainTextWriter {
    fn default() -> Self {
        Self::new(DEFAULT_WRITE_BUFFER_SIZE)
    }
}

impl ChainWriter for PlainTextWriter {
    fn wrap(&self, target: Target) -> io::Result<Box<dyn ChainWrite>> {
        Ok(Box::new(PlainTextChain {
            writer: BufWriter::with_capacity(self.buffer_size, target),
            bytes_written: 0,
        }))
    }

    fn file_extension(&self) -> &'static str {
        ".jsonl"
    }
}

struct PlainTextChain {
    writer: BufWriter<Target>,
    bytes_written: u64,
}

impl Write for PlainTextChain {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.writer.write(buf)?;
        self.bytes_written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl ChainWrite for PlainTextChain {
    fn finish(mut self: Box<Self>) -> io::Result<()> {
        self.writer.flush()
    }

    fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

// ============================================================================
// Lz4Writer - LZ4 compressed output
// ============================================================================

/// LZ4 frame compressed writer
///
/// Appending to an existing `.lz4` file starts a new frame after the old
/// ones; `LogReader` decodes every frame in turn.
#[derive(Debug, Clone)]
pub struct Lz4Writer {
    buffer_size: usize,
}

impl Lz4Writer {
    /// Create a new LZ4 writer with the specified buffer size
    pub fn new(buffer_size: usize) -> Self {
        Self { buffer_size }
    }
}

impl Default for Lz4Writer {
    fn default() -> Self {
        Self::new(DEFAULT_WRITE_BUFFER_SIZE)
    }
}

impl ChainWriter for Lz4Writer {
    fn wrap(&self, target: Target) -> io::Result<Box<dyn ChainWrite>> {
        let buf_writer = BufWriter::with_capacity(self.buffer_size, target);
        Ok(Box::new(Lz4Chain {
            encoder: FrameEncoder::new(buf_writer),
            bytes_written: 0,
        }))
    }

    fn file_extension(&self) -> &'static str {
        ".jsonl.lz4"
    }
}

struct Lz4Chain {
    encoder: FrameEncoder<BufWriter<Target>>,
    bytes_written: u64,
}

impl Write for Lz4Chain {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.encoder.write(buf)?;
        self.bytes_written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.encoder.flush()
    }
}

impl ChainWrite for Lz4Chain {
    fn finish(self: Box<Self>) -> io::Result<()> {
        let mut buf_writer = self.encoder.finish()?;
        buf_writer.flush()
    }

    fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

// ============================================================================
// GzipWriter - gzip compressed output
// ============================================================================

/// gzip compressed writer
///
/// Appending to an existing `.gz` file adds a new gzip member, which
/// multi-member decoders such as `gunzip` and `LogReader` read through.
#[derive(Debug, Clone)]
pub struct GzipWriter {
    buffer_size: usize,
    level: GzLevel,
}

impl GzipWriter {
    /// Create a new gzip writer with the specified buffer size
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffer_size,
            level: GzLevel::default(),
        }
    }

    /// Set the compression level (0-9)
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = GzLevel::new(level.min(9));
        self
    }
}

impl Default for GzipWriter {
    fn default() -> Self {
        Self::new(DEFAULT_WRITE_BUFFER_SIZE)
    }
}

impl ChainWriter for GzipWriter {
    fn wrap(&self, target: Target) -> io::Result<Box<dyn ChainWrite>> {
        let buf_writer = BufWriter::with_capacity(self.buffer_size, target);
        Ok(Box::new(GzipChain {
            encoder: GzEncoder::new(buf_writer, self.level),
            bytes_written: 0,
        }))
    }

    fn file_extension(&self) -> &'static str {
        ".jsonl.gz"
    }
}

struct GzipChain {
    encoder: GzEncoder<BufWriter<Target>>,
    bytes_written: u64,
}

impl Write for GzipChain {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.encoder.write(buf)?;
        self.bytes_written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.encoder.flush()
    }
}

impl ChainWrite for GzipChain {
    fn finish(self: Box<Self>) -> io::Result<()> {
        let mut buf_writer = self.encoder.finish()?;
        buf_writer.flush()
    }

    fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}
