//! Symbol search over the client-side search index of Doxygen documentation.
//!
//! Doxygen ships its search box data as `search/all_XX.js` shards. This crate
//! loads them into an immutable [`SymbolIndexTable`] and answers the same
//! case-insensitive prefix queries the search box does, from Rust, the command
//! line, or an MCP client.

pub mod cache;
pub mod cli;
pub mod error;
pub mod format;
pub mod search;
pub mod server;
pub mod tools;
pub mod tracing;

pub use cache::{IndexCache, load_dir, load_or_build};
pub use error::{LoadError, Malformation, Result};
pub use search::{Entry, Matches, Occurrence, RawEntry, Suggestion, SymbolIndexTable};
pub use server::SymbolServer;
