//! Transaction - records sharing one correlation id

use crate::Record;

/// A completed logical unit: a correlation id and its records
///
/// Records keep the order in which the grouper received them. Writers that
/// need time order sort a copy; the transaction itself is never reordered.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    id: String,
    records: Vec<Record>,
}

impl Transaction {
    /// Create a transaction from its id and records
    pub fn new(id: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            id: id.into(),
            records,
        }
    }

    /// Correlation id shared by all records
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Records in arrival order
    #[inline]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the transaction holds no records
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records in arrival order
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Split into `(id, records)`
    pub fn into_parts(self) -> (String, Vec<Record>) {
        (self.id, self.records)
    }
}

impl From<(String, Vec<Record>)> for Transaction {
    fn from((id, records): (String, Vec<Record>)) -> Self {
        Self { id, records }
    }
}

impl From<Transaction> for (String, Vec<Record>) {
    fn from(tx: Transaction) -> Self {
        tx.into_parts()
    }
}

impl<'a> IntoIterator for &'a Transaction {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl IntoIterator for Transaction {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
