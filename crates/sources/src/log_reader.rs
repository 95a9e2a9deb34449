//! Log reader - lazy record decoding from files or streams
//!
//! # Usage
//!
//! ```ignore
//! let reader = LogReader::open("audit.log.gz")?;
//! let records: Vec<Record> = reader.records().collect::<Result<_, _>>()?;
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::bufread::MultiGzDecoder;
use vaudit_config::{Compression, DEFAULT_READ_BUFFER_SIZE, ReaderConfig};
use vaudit_protocol::{Record, decode_line};

use crate::decode::{Lz4Frames, sniff};
use crate::error::{Result, SourceError};

#[cfg(test)]
#[path = "log_reader_test.rs"]
mod tests;

/// Reads one record per line from an audit log
///
/// Paths ending in `.lz4` or `.gz` are decompressed, as are files whose
/// first bytes carry an LZ4 or gzip magic number. Lines are decoded lossily, so invalid UTF-8 yields a raw record with replacement
/// characters instead of aborting the stream.
pub struct LogReader {
    reader: Box<dyn BufRead>,
    compression: Compression,
    line: Vec<u8>,
    line_number: u64,
}

impl LogReader {
    /// Open a log file with default settings
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, &ReaderConfig::default())
    }

    /// Open a log file
    ///
    /// With `compression = auto` the codec comes from the file extension,
    /// falling back to the leading magic bytes for other names.
    pub fn open_with(path: impl AsRef<Path>, config: &ReaderConfig) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| SourceError::open(path, e))?;
        let mut buf_reader = BufReader::with_capacity(config.buffer_size, file);

        let compression = match config.compression.resolve(path) {
            Compression::None if config.compression == Compression::Auto => {
                let head = buf_reader.fill_buf().map_err(|e| SourceError::read(0, e))?;
                sniff(head)
            }
            resolved => resolved,
        };

        let reader: Box<dyn BufRead> = match compression {
            Compression::Lz4 => Box::new(BufReader::with_capacity(
                config.buffer_size,
                Lz4Frames::new(buf_reader),
            )),
            Compression::Gzip => Box::new(BufReader::with_capacity(
                config.buffer_size,
                MultiGzDecoder::new(buf_reader),
            )),
            Compression::None | Compression::Auto => Box::new(buf_reader),
        };

        tracing::debug!(path = %path.display(), compression = ?compression, "opened log");

        Ok(Self {
            reader,
            compression,
            line: Vec::new(),
            line_number: 0,
        })
    }

    /// Adopt an already open stream
    ///
    /// The stream is read as plain text; wrap it in a decoder first if it
    /// is compressed.
    pub fn from_reader<R: Read + 'static>(reader: R) -> Self {
        Self {
            reader: Box::new(BufReader::with_capacity(DEFAULT_READ_BUFFER_SIZE, reader)),
            compression: Compression::None,
            line: Vec::new(),
            line_number: 0,
        }
    }

    /// Check if the input is compressed
    pub fn is_compressed(&self) -> bool {
        self.compression.is_compressed()
    }

    /// Codec the input is decoded with
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Number of lines consumed so far, blank lines included
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// Read the next record
    ///
    /// Blank lines are skipped. Returns `None` at end of stream.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        loop {
            self.line.clear();
            let n = self
                .reader
                .read_until(b'\n', &mut self.line)
                .map_err(|e| SourceError::read(self.line_number, e))?;
            if n == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            if let Some(record) = decode_line(&String::from_utf8_lossy(&self.line)) {
                return Ok(Some(record));
            }
        }
    }

    /// Read all remaining records
    pub fn read_all(&mut self) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_record()? {
            records.push(record);
        }
        Ok(records)
    }

    /// Iterate over remaining records
    pub fn records(self) -> Records {
        Records {
            reader: self,
            done: false,
        }
    }
}

impl std::fmt::Debug for LogReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogReader")
            .field("compression", &self.compression)
            .field("line_number", &self.line_number)
            .finish()
    }
}

impl IntoIterator for LogReader {
    type Item = Result<Record>;
    type IntoIter = Records;

    fn into_iter(self) -> Self::IntoIter {
        self.records()
    }
}

/// Iterator over records of a `LogReader`
///
/// Ends after the first read error.
#[derive(Debug)]
pub struct Records {
    reader: LogReader,
    done: bool,
}

impl Iterator for Records {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.reader.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
