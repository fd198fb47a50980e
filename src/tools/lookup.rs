//! Exact symbol lookup handler.

use crate::{format, search::SymbolIndexTable};
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupRequest {
    /// Full symbol name, e.g. "CLI" or "CLI.h" (case-insensitive)
    pub symbol: String,
}

/// List every documented location of one symbol.
pub fn handle_lookup(table: &SymbolIndexTable, request: LookupRequest) -> Result<String, String> {
    let Some(entry) = table.get(&request.symbol) else {
        let mut message = format!("Symbol '{}' not found.", request.symbol);
        format::write_suggestions(&mut message, &table.suggest(&request.symbol, 5));
        return Err(message);
    };

    let mut result = String::new();
    format::write_entry(&mut result, entry, usize::MAX);

    let mut files: Vec<&str> = entry
        .occurrences
        .iter()
        .filter_map(|occurrence| occurrence.defined_in())
        .collect();
    files.sort_unstable();
    files.dedup();
    if !files.is_empty() {
        let _ = writeln!(result, "\nDefined in: {}", files.join(", "));
    }

    Ok(result)
}
