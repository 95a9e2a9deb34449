//! Grouping state
//!
//! Push-based core of the grouper. Iterator adapters in the parent module
//! drive it; it can also be fed by hand.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, VecDeque};

use vaudit_protocol::{Record, Transaction};

use super::{DefaultFinal, default_is_final};

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

/// Grouping counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupMetrics {
    /// Records pushed
    pub records_received: u64,
    /// Records without a string correlation id
    pub records_skipped: u64,
    /// Transactions completed by a final record
    pub transactions_finalized: u64,
    /// Incomplete transactions emitted by an explicit flush
    pub transactions_flushed: u64,
}

/// Records collected for one correlation id
#[derive(Debug)]
struct PendingBuffer {
    /// First-seen order of the id
    seq: u64,
    records: Vec<Record>,
    ready: bool,
}

/// Buffers records per correlation id until a final record arrives
///
/// Ready transactions are handed out in the order they became ready.
/// Drain them with [`pop_ready`](Self::pop_ready) after each push; records
/// pushed for an id that is ready but not yet drained join the same
/// transaction.
pub struct TransactionGrouper<F = DefaultFinal> {
    is_final: F,
    buffers: HashMap<String, PendingBuffer>,
    /// First-seen order of open ids
    arrival: BTreeMap<u64, String>,
    ready: VecDeque<String>,
    next_seq: u64,
    metrics: GroupMetrics,
}

impl TransactionGrouper {
    /// Create a grouper using [`default_is_final`]
    pub fn new() -> Self {
        Self::with_final(default_is_final as DefaultFinal)
    }
}

impl Default for TransactionGrouper {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> TransactionGrouper<F>
where
    F: FnMut(&Record) -> bool,
{
    /// Create a grouper with a custom finalization predicate
    pub fn with_final(is_final: F) -> Self {
        Self {
            is_final,
            buffers: HashMap::new(),
            arrival: BTreeMap::new(),
            ready: VecDeque::new(),
            next_seq: 0,
            metrics: GroupMetrics::default(),
        }
    }

    /// Add a record
    ///
    /// Returns true if the record completed its transaction. Records with
    /// no string `request.id` are dropped and counted as skipped.
    pub fn push(&mut self, record: Record) -> bool {
        self.metrics.records_received += 1;

        let Some(id) = record.correlation_id().map(str::to_owned) else {
            self.metrics.records_skipped += 1;
            tracing::trace!("record without correlation id skipped");
            return false;
        };

        let is_final = (self.is_final)(&record);

        let buffer = match self.buffers.entry(id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.arrival.insert(seq, entry.key().clone());
                entry.insert(PendingBuffer {
                    seq,
                    records: Vec::new(),
                    ready: false,
                })
            }
        };
        buffer.records.push(record);

        if is_final && !buffer.ready {
            buffer.ready = true;
            if let Some(id) = self.arrival.get(&buffer.seq) {
                self.ready.push_back(id.clone());
            }
        }

        is_final
    }

    /// Take the next completed transaction
    pub fn pop_ready(&mut self) -> Option<Transaction> {
        while let Some(id) = self.ready.pop_front() {
            if let Some(tx) = self.take(id) {
                self.metrics.transactions_finalized += 1;
                tracing::trace!(id = tx.id(), records = tx.len(), "transaction finalized");
                return Some(tx);
            }
        }
        None
    }

    /// Take the oldest open transaction, complete or not
    ///
    /// Completed transactions are returned first. Used to flush at end of
    /// input.
    pub fn pop_pending(&mut self) -> Option<Transaction> {
        if let Some(tx) = self.pop_ready() {
            return Some(tx);
        }

        let (_, id) = self.arrival.first_key_value()?;
        let id = id.clone();
        let tx = self.take(id)?;
        self.metrics.transactions_flushed += 1;
        tracing::trace!(id = tx.id(), records = tx.len(), "transaction flushed");
        Some(tx)
    }

    /// Take every open transaction in first-seen order
    pub fn flush_all(&mut self) -> Vec<Transaction> {
        std::iter::from_fn(|| self.pop_pending()).collect()
    }

    /// Number of open transactions
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.buffers.len()
    }

    /// Check if a completed transaction is waiting
    #[inline]
    pub fn has_ready(&self) -> bool {
        !self.ready.is_empty()
    }

    /// Check if no transaction is open
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Counters so far
    pub fn metrics(&self) -> GroupMetrics {
        self.metrics
    }

    fn take(&mut self, id: String) -> Option<Transaction> {
        let buffer = self.buffers.remove(&id)?;
        self.arrival.remove(&buffer.seq);
        Some(Transaction::new(id, buffer.records))
    }
}

impl<F> std::fmt::Debug for TransactionGrouper<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionGrouper")
            .field("pending", &self.buffers.len())
            .field("ready", &self.ready.len())
            .field("metrics", &self.metrics)
            .finish()
    }
}
