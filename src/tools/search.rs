//! Prefix search handler for finding documented symbols.

use crate::{format, search::SymbolIndexTable};
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

/// Locations listed per symbol before the rest are summarized.
const OCCURRENCES_PER_SYMBOL: usize = 5;

/// Near misses offered when nothing matches.
const SUGGESTIONS: usize = 5;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Symbol name or the beginning of one, as typed into the search box
    pub query: String,
    /// Maximum number of symbols to return (default: 20)
    #[serde(default = "default_limit")]
    pub limit: Option<usize>,
}

fn default_limit() -> Option<usize> {
    Some(20)
}

/// Execute a prefix search and render the matches.
pub fn handle_search(table: &SymbolIndexTable, request: SearchRequest) -> Result<String, String> {
    let limit = request.limit.unwrap_or(20).max(1);
    let matches = table.search(&request.query);

    if matches.needle().is_empty() {
        return Err("Query is empty. Provide the beginning of a symbol name.".to_string());
    }

    let total = matches.clone().count();
    tracing::debug!(
        "Search '{}' (key prefix '{}') matched {} symbols",
        request.query,
        matches.needle(),
        total
    );

    let mut result = String::new();
    if total == 0 {
        let _ = writeln!(result, "No symbols found matching '{}'.", request.query);
        format::write_suggestions(&mut result, &table.suggest(&request.query, SUGGESTIONS));
        return Ok(result);
    }

    let _ = writeln!(
        result,
        "Found {} symbol{} matching '{}':\n",
        total,
        if total == 1 { "" } else { "s" },
        request.query
    );
    for entry in matches.take(limit) {
        format::write_entry(&mut result, entry, OCCURRENCES_PER_SYMBOL);
    }
    if total > limit {
        let _ = writeln!(
            result,
            "\n({} more not shown; narrow the query or raise the limit)",
            total - limit
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::{fixture, rstest};

    #[fixture]
    fn table() -> SymbolIndexTable {
        SymbolIndexTable::from_js(
            "[['cli',['CLI',['../cli.html',1,'libCLAP::CLAP']]],\
             ['cli_2eh',['CLI.h',['../_c_l_i_8h.html',1,'']]],\
             ['closure',['Closure',['../union_closure.html',1,'']]]]",
        )
        .unwrap()
    }

    fn request(query: &str, limit: Option<usize>) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            limit,
        }
    }

    #[rstest]
    fn test_search_renders_matches(table: SymbolIndexTable) {
        let_assert!(Ok(output) = handle_search(&table, request("CLI", None)));
        check!(output.starts_with("Found 2 symbols matching 'CLI':"));
        check!(output.contains("../cli.html  [libCLAP::CLAP]"));
        check!(output.contains("CLI.h"));
        check!(!output.contains("Closure"));
    }

    #[rstest]
    fn test_search_limit(table: SymbolIndexTable) {
        let_assert!(Ok(output) = handle_search(&table, request("c", Some(1))));
        check!(output.contains("Found 3 symbols"));
        check!(output.contains("2 more not shown"));
        check!(!output.contains("Closure"));
    }

    #[rstest]
    fn test_search_no_match_suggests(table: SymbolIndexTable) {
        let_assert!(Ok(output) = handle_search(&table, request("closr", None)));
        check!(output.contains("No symbols found matching 'closr'"));
        check!(output.contains("Did you mean:"));
        check!(output.contains("Closure"));
    }

    #[rstest]
    fn test_search_blank_query_rejected(table: SymbolIndexTable) {
        let_assert!(Err(message) = handle_search(&table, request("  ", None)));
        check!(message.contains("empty"));
    }

    #[test]
    fn test_limit_defaults_when_omitted() {
        let request: SearchRequest = serde_json::from_str(r#"{"query": "cli"}"#).unwrap();
        check!(request.limit == Some(20));
    }
}
