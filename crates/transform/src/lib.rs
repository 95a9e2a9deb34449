//! vaudit - Transform
//!
//! Record selection and transaction assembly.
//!
//! # Overview
//!
//! Both transforms are pull-based and synchronous. They hold no shared
//! state, so separate instances can run on separate threads.
//!
//! ```text
//! [Record] → [group] → [Transaction] → [EventFilter] → [Transaction']
//! ```
//!
//! # Modules
//!
//! - `filter` - Match records by the value at a dotted key path
//! - `group` - Assemble records into transactions by correlation id
//!
//! # Example
//!
//! ```ignore
//! use vaudit_transform::{EventFilter, GroupTransactions};
//!
//! let errors = EventFilter::present("error");
//! let failed = records
//!     .transactions()
//!     .filter(|tx| errors.matches_transaction(tx));
//! ```

mod error;
pub mod filter;
pub mod group;

pub use error::TransformError;
pub use filter::{EventFilter, MatchCriterion, Predicate, matches};
pub use group::{
    DefaultFinal, FinalTypes, GroupMetrics, GroupTransactions, TransactionGrouper, Transactions,
    TryGroupTransactions, TryTransactions, default_is_final, group, group_with,
};

/// Result type for transform construction
pub type TransformResult<T> = std::result::Result<T, TransformError>;
