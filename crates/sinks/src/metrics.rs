//! Writer metrics

/// Counters for a single writer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterMetrics {
    /// Records written
    pub records_written: u64,

    /// Bytes handed to the output chain (before compression)
    pub bytes_written: u64,

    /// Explicit flush operations
    pub flush_count: u64,
}

impl WriterMetrics {
    /// Create zeroed counters
    pub const fn new() -> Self {
        Self {
            records_written: 0,
            bytes_written: 0,
            flush_count: 0,
        }
    }

    /// Record a written line
    #[inline]
    pub fn record_written(&mut self, bytes: u64) {
        self.records_written += 1;
        self.bytes_written += bytes;
    }

    /// Record a flush
    #[inline]
    pub fn flushed(&mut self) {
        self.flush_count += 1;
    }
}
