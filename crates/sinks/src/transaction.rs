//! Time-ordered transaction output
//!
//! Writes the records of one or many transactions ordered by a top-level
//! time field. Many transactions are combined with a k-way merge: each
//! transaction is sorted on its own, then the smallest head is written
//! repeatedly.
//!
//! Keys compare as strings, so ISO-8601 timestamps sort correctly and
//! mixed formats do not.

use std::borrow::Cow;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::path::Path;

use vaudit_config::WriterConfig;
use vaudit_protocol::{DEFAULT_TIME_KEY, Record, Transaction, value_text};

use crate::error::Result;
use crate::log_writer::LogWriter;
use crate::sink::RecordSink;

#[cfg(test)]
#[path = "transaction_test.rs"]
mod tests;

/// Sort key of a record
///
/// The text of the top-level field `time_key` (no dot splitting). Raw
/// records, non-object records, and missing or `null` fields sort as the
/// empty string.
pub fn time_sort_key<'a>(record: &'a Record, time_key: &str) -> Cow<'a, str> {
    match record.field(time_key) {
        Some(value) => value_text(value),
        None => Cow::Borrowed(""),
    }
}

/// Stable sort of records by [`time_sort_key`]
pub fn sort_by_time<'a>(records: &'a [Record], time_key: &str) -> Vec<&'a Record> {
    let mut sorted: Vec<&Record> = records.iter().collect();
    sorted.sort_by_cached_key(|record| time_sort_key(record, time_key).into_owned());
    sorted
}

/// Pending head of one transaction during a merge
///
/// Ordered by `(key, seq)` only. `seq` comes from one counter per merge
/// and is unique, so equal keys resolve in push order.
#[derive(Debug)]
pub struct MergeEntry {
    /// Time sort key
    pub key: String,
    /// Push order within the merge
    pub seq: u64,
    /// Index of the transaction the record came from
    pub source: usize,
    /// The record itself
    pub record: Record,
}

impl PartialEq for MergeEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.seq == other.seq
    }
}

impl Eq for MergeEntry {}

impl PartialOrd for MergeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MergeEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Min-heap of merge heads with its sequence counter
struct MergeQueue {
    heap: BinaryHeap<Reverse<MergeEntry>>,
    next_seq: u64,
}

impl MergeQueue {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_seq: 0,
        }
    }

    fn push(&mut self, source: usize, record: Record, time_key: &str) {
        let key = time_sort_key(&record, time_key).into_owned();
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(MergeEntry {
            key,
            seq,
            source,
            record,
        }));
    }

    fn pop(&mut self) -> Option<MergeEntry> {
        self.heap.pop().map(|Reverse(entry)| entry)
    }
}

/// Writes transactions to a sink in time order
#[derive(Debug)]
pub struct TransactionWriter<S> {
    sink: S,
    time_key: String,
}

impl<S: RecordSink> TransactionWriter<S> {
    /// Create a writer ordering by the `time` field
    pub fn new(sink: S) -> Self {
        Self::with_time_key(sink, DEFAULT_TIME_KEY)
    }

    /// Create a writer ordering by a custom top-level field
    pub fn with_time_key(sink: S, time_key: impl Into<String>) -> Self {
        Self {
            sink,
            time_key: time_key.into(),
        }
    }

    /// Field used for ordering
    pub fn time_key(&self) -> &str {
        &self.time_key
    }

    /// Write one transaction, records sorted by time
    ///
    /// Returns the number of records written.
    pub fn write_transaction(&mut self, tx: &Transaction) -> Result<usize> {
        let sorted = sort_by_time(tx.records(), &self.time_key);
        for record in &sorted {
            self.sink.write(record)?;
        }

        tracing::debug!(id = tx.id(), records = sorted.len(), "transaction written");
        Ok(sorted.len())
    }

    /// Merge many transactions into one time-ordered stream
    ///
    /// Each transaction is sorted on its own and then merged, so the output
    /// is non-decreasing by time key. Returns the number of records
    /// written.
    pub fn write_transactions<I>(&mut self, transactions: I) -> Result<usize>
    where
        I: IntoIterator<Item = Transaction>,
    {
        let mut sources: Vec<std::vec::IntoIter<Record>> = Vec::new();
        for tx in transactions {
            let (_, mut records) = tx.into_parts();
            if records.is_empty() {
                continue;
            }
            records.sort_by_cached_key(|record| time_sort_key(record, &self.time_key).into_owned());
            sources.push(records.into_iter());
        }

        let mut queue = MergeQueue::with_capacity(sources.len());
        for (source, records) in sources.iter_mut().enumerate() {
            if let Some(record) = records.next() {
                queue.push(source, record, &self.time_key);
            }
        }

        let mut written = 0;
        while let Some(entry) = queue.pop() {
            self.sink.write(&entry.record)?;
            written += 1;

            if let Some(next) = sources[entry.source].next() {
                queue.push(entry.source, next, &self.time_key);
            }
        }

        tracing::debug!(
            transactions = sources.len(),
            records = written,
            "transactions merged"
        );
        Ok(written)
    }

    /// Flush the underlying sink
    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()
    }

    /// Borrow the underlying sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Unwrap the underlying sink
    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl TransactionWriter<LogWriter> {
    /// Open an output file ordered by `config.time_key`
    pub fn create(path: impl AsRef<Path>, config: &WriterConfig) -> Result<Self> {
        let sink = LogWriter::create(path, config)?;
        Ok(Self::with_time_key(sink, config.time_key.clone()))
    }

    /// Flush and finish the output file
    pub fn close(self) -> Result<()> {
        self.sink.close()
    }
}
