//! Transaction grouping
//!
//! Groups a record stream into transactions keyed by `request.id`.
//!
//! A transaction is emitted as soon as a final record (by default one whose
//! `type` is `response`) arrives for its id. Transactions still open when
//! the input ends are flushed in the order their ids were first seen.
//! Records without a string `request.id` are left out.
//!
//! An id seen again after its transaction was emitted starts a new
//! transaction with the same id.
//!
//! # Example
//!
//! ```ignore
//! use vaudit_transform::GroupTransactions;
//!
//! for tx in reader.read_all()?.into_iter().transactions() {
//!     println!("Transaction {}: {} events", tx.id(), tx.len());
//! }
//! ```

mod finalize;
mod state;

pub use finalize::{FinalTypes, default_is_final};
pub use state::{GroupMetrics, TransactionGrouper};

use vaudit_protocol::{Record, Transaction};

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

/// Finalization predicate type used when none is given
pub type DefaultFinal = fn(&Record) -> bool;

/// Group records using [`default_is_final`]
pub fn group<I>(records: I) -> Transactions<I::IntoIter>
where
    I: IntoIterator<Item = Record>,
{
    group_with(records, default_is_final as DefaultFinal)
}

/// Group records using a custom finalization predicate
pub fn group_with<I, F>(records: I, is_final: F) -> Transactions<I::IntoIter, F>
where
    I: IntoIterator<Item = Record>,
    F: FnMut(&Record) -> bool,
{
    Transactions {
        source: records.into_iter(),
        grouper: TransactionGrouper::with_final(is_final),
        exhausted: false,
    }
}

/// Lazy sequence of transactions over an infallible record source
#[derive(Debug)]
pub struct Transactions<I, F = DefaultFinal> {
    source: I,
    grouper: TransactionGrouper<F>,
    exhausted: bool,
}

impl<I, F> Transactions<I, F>
where
    F: FnMut(&Record) -> bool,
{
    /// Counters so far
    pub fn metrics(&self) -> GroupMetrics {
        self.grouper.metrics()
    }
}

impl<I, F> Iterator for Transactions<I, F>
where
    I: Iterator<Item = Record>,
    F: FnMut(&Record) -> bool,
{
    type Item = Transaction;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(tx) = self.grouper.pop_ready() {
                return Some(tx);
            }

            if self.exhausted {
                return self.grouper.pop_pending();
            }

            match self.source.next() {
                Some(record) => {
                    self.grouper.push(record);
                }
                None => {
                    self.exhausted = true;
                    tracing::debug!(
                        pending = self.grouper.pending_count(),
                        "record source exhausted, flushing open transactions"
                    );
                }
            }
        }
    }
}

/// Lazy sequence of transactions over a fallible record source
///
/// The first source error is passed through and ends the sequence. Open
/// transactions are not flushed after an error.
#[derive(Debug)]
pub struct TryTransactions<I, F = DefaultFinal> {
    source: I,
    grouper: TransactionGrouper<F>,
    exhausted: bool,
    failed: bool,
}

impl<I, F> TryTransactions<I, F>
where
    F: FnMut(&Record) -> bool,
{
    /// Create from a fallible source and finalization predicate
    pub fn new(source: I, is_final: F) -> Self {
        Self {
            source,
            grouper: TransactionGrouper::with_final(is_final),
            exhausted: false,
            failed: false,
        }
    }

    /// Counters so far
    pub fn metrics(&self) -> GroupMetrics {
        self.grouper.metrics()
    }
}

impl<I, F, E> Iterator for TryTransactions<I, F>
where
    I: Iterator<Item = Result<Record, E>>,
    F: FnMut(&Record) -> bool,
{
    type Item = Result<Transaction, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            if let Some(tx) = self.grouper.pop_ready() {
                return Some(Ok(tx));
            }

            if self.exhausted {
                return self.grouper.pop_pending().map(Ok);
            }

            match self.source.next() {
                Some(Ok(record)) => {
                    self.grouper.push(record);
                }
                Some(Err(e)) => {
                    self.failed = true;
                    tracing::debug!(
                        pending = self.grouper.pending_count(),
                        "record source failed, dropping open transactions"
                    );
                    return Some(Err(e));
                }
                None => {
                    self.exhausted = true;
                }
            }
        }
    }
}

/// Group an iterator of records into transactions
pub trait GroupTransactions: Iterator<Item = Record> + Sized {
    /// Group using [`default_is_final`]
    fn transactions(self) -> Transactions<Self> {
        group(self)
    }

    /// Group using a custom finalization predicate
    fn transactions_with<F>(self, is_final: F) -> Transactions<Self, F>
    where
        F: FnMut(&Record) -> bool,
    {
        group_with(self, is_final)
    }
}

impl<I: Iterator<Item = Record>> GroupTransactions for I {}

/// Group an iterator of fallible records into transactions
pub trait TryGroupTransactions<E>: Iterator<Item = Result<Record, E>> + Sized {
    /// Group using [`default_is_final`]
    fn try_transactions(self) -> TryTransactions<Self> {
        TryTransactions::new(self, default_is_final as DefaultFinal)
    }

    /// Group using a custom finalization predicate
    fn try_transactions_with<F>(self, is_final: F) -> TryTransactions<Self, F>
    where
        F: FnMut(&Record) -> bool,
    {
        TryTransactions::new(self, is_final)
    }
}

impl<I, E> TryGroupTransactions<E> for I where I: Iterator<Item = Result<Record, E>> {}
