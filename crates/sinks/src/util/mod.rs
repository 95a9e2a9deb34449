//! Sink utilities
//!
//! - **chain_writer**: Pluggable output chains (plain text, LZ4, gzip)

pub mod chain_writer;
