//! Log writer - one record per line to a file or stream
//!
//! Structured records are written as compact JSON, raw records verbatim.
//! Output is buffered and optionally LZ4 or gzip compressed; see
//! [`chain_writer`](crate::util::chain_writer).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use vaudit_config::{Compression, WriteMode, WriterConfig};
use vaudit_protocol::{Record, encode_line};

use crate::error::{Result, SinkError};
use crate::metrics::WriterMetrics;
use crate::sink::RecordSink;
use crate::util::chain_writer::{self, ChainWrite};

#[cfg(test)]
#[path = "log_writer_test.rs"]
mod tests;

/// Writes records to a file or an adopted stream
///
/// Call [`close`](Self::close) to observe finish errors. Dropping an open
/// writer finishes it too and logs any failure.
pub struct LogWriter {
    chain: Option<Box<dyn ChainWrite>>,
    compression: Compression,
    line: Vec<u8>,
    metrics: WriterMetrics,
}

impl LogWriter {
    /// Open a file for appending with default settings
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::create(path, &WriterConfig::default())
    }

    /// Open a file for writing
    ///
    /// The file is created if missing. `mode` decides whether existing
    /// content is kept or truncated.
    pub fn create(path: impl AsRef<Path>, config: &WriterConfig) -> Result<Self> {
        let path = path.as_ref();

        let mut options = OpenOptions::new();
        options.create(true);
        match config.mode {
            WriteMode::Append => options.append(true),
            WriteMode::Truncate => options.write(true).truncate(true),
        };
        let file = options.open(path).map_err(|e| SinkError::create(path, e))?;

        let compression = config.compression.resolve(path);
        let writer = chain_writer::for_compression(compression, config.buffer_size);
        let chain = writer.wrap(Box::new(file))?;

        tracing::debug!(
            path = %path.display(),
            mode = ?config.mode,
            compression = ?compression,
            "opened output"
        );

        Ok(Self::with_chain(chain, compression))
    }

    /// Adopt an already open stream
    ///
    /// Compressed only when `compression` names a codec; there is no path
    /// to infer it from.
    pub fn from_writer<W>(writer: W, config: &WriterConfig) -> Result<Self>
    where
        W: Write + Send + 'static,
    {
        let compression = match config.compression {
            Compression::Auto => Compression::None,
            explicit => explicit,
        };
        let chain = chain_writer::for_compression(compression, config.buffer_size)
            .wrap(Box::new(writer))?;
        Ok(Self::with_chain(chain, compression))
    }

    fn with_chain(chain: Box<dyn ChainWrite>, compression: Compression) -> Self {
        Self {
            chain: Some(chain),
            compression,
            line: Vec::new(),
            metrics: WriterMetrics::new(),
        }
    }

    /// Check if output is compressed
    pub fn is_compressed(&self) -> bool {
        self.compression.is_compressed()
    }

    /// Codec the output is written with
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Counters so far
    pub fn metrics(&self) -> WriterMetrics {
        self.metrics
    }

    /// Flush and finish the output, reporting any failure
    pub fn close(mut self) -> Result<()> {
        self.finish()
    }

    fn finish(&mut self) -> Result<()> {
        let Some(chain) = self.chain.take() else {
            return Ok(());
        };
        chain.finish()?;

        tracing::info!(
            records = self.metrics.records_written,
            bytes = self.metrics.bytes_written,
            "closed output"
        );
        Ok(())
    }
}

impl RecordSink for LogWriter {
    fn write(&mut self, record: &Record) -> Result<()> {
        let chain = self.chain.as_mut().ok_or(SinkError::Closed)?;

        self.line.clear();
        encode_line(record, &mut self.line)?;
        chain.write_all(&self.line)?;

        self.metrics.record_written(self.line.len() as u64);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let chain = self.chain.as_mut().ok_or(SinkError::Closed)?;
        chain.flush()?;
        self.metrics.flushed();
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            tracing::warn!(error = %e, "failed to finish output");
        }
    }
}

impl std::fmt::Debug for LogWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogWriter")
            .field("open", &self.chain.is_some())
            .field("compression", &self.compression)
            .field("metrics", &self.metrics)
            .finish()
    }
}
