//! Symbol search over Doxygen search-index tables.
//!
//! This module provides key normalization, shard parsing, and the immutable
//! [`SymbolIndexTable`] answering prefix queries.

// Module declarations
pub(crate) mod entry;
pub mod key;
pub mod shard;
pub(crate) mod table;

// Public re-exports (used via lib.rs)
pub use entry::{Entry, Occurrence, RawEntry};
pub use shard::{parse_json, parse_shard, shard_name};
pub use table::{Matches, Suggestion, SymbolIndexTable};
