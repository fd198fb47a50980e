//! Command-line interface.

use crate::cache::{DEFAULT_CATEGORY, IndexCache};
use crate::error::Result;
use crate::format;
use crate::search::SymbolIndexTable;
use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "doxysearch")]
#[command(about = "Query the search index of a Doxygen documentation site", long_about = None)]
pub struct Cli {
    /// Directory holding the search shards, usually `html/search`
    #[arg(short, long, global = true, env = "DOXYSEARCH_DIR", default_value = ".")]
    pub dir: PathBuf,
    /// Shard category to load (`all`, `classes`, `functions`, ...)
    #[arg(long, global = true, default_value = DEFAULT_CATEGORY)]
    pub category: String,
    /// Parse the shards on every run instead of using the index cache
    #[arg(long, global = true)]
    pub no_cache: bool,
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List symbols whose name starts with a prefix
    Query {
        prefix: String,
        #[arg(short = 'n', long, default_value = "25")]
        limit: usize,
        /// Print matching entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show every documented location of one symbol
    Lookup {
        symbol: String,
        /// Print the entry as JSON
        #[arg(long)]
        json: bool,
    },
    /// Propose symbols with names similar to a misspelled one
    Suggest {
        text: String,
        #[arg(short = 'n', long, default_value = "5")]
        limit: usize,
    },
    /// Serve the table to MCP clients over stdio
    Serve,
}

impl Cli {
    /// The cache to load through, unless disabled.
    pub fn cache(&self) -> Option<IndexCache> {
        if self.no_cache {
            None
        } else {
            IndexCache::default_for(&self.dir)
        }
    }

    /// Loads the table the flags point at.
    pub fn load_table(&self) -> Result<SymbolIndexTable> {
        crate::cache::load_or_build(&self.dir, &self.category, self.cache().as_ref())
            .with_context(|| format!("Failed to load search index from {}", self.dir.display()))
    }
}

/// Runs a one-shot command against `table` and returns what to print.
///
/// `serve` is not one-shot and is rejected here.
pub fn render(command: &Commands, table: &SymbolIndexTable) -> Result<String> {
    let mut out = String::new();

    match command {
        Commands::Query {
            prefix,
            limit,
            json,
        } => {
            let matches: Vec<_> = table.search(prefix).take(*limit).collect();
            if *json {
                out = serde_json::to_string_pretty(&matches)?;
                out.push('\n');
            } else if matches.is_empty() {
                let _ = writeln!(out, "No symbols found matching '{}'.", prefix);
            } else {
                for entry in matches {
                    format::write_entry(&mut out, entry, usize::MAX);
                }
            }
        }
        Commands::Lookup { symbol, json } => {
            let Some(entry) = table.get(symbol) else {
                bail!("Symbol '{}' not found", symbol);
            };
            if *json {
                out = serde_json::to_string_pretty(entry)?;
                out.push('\n');
            } else {
                format::write_entry(&mut out, entry, usize::MAX);
            }
        }
        Commands::Suggest { text, limit } => {
            for suggestion in table.suggest(text, *limit) {
                let _ = writeln!(
                    out,
                    "{:.3}  {}",
                    suggestion.score, suggestion.entry.label
                );
            }
        }
        Commands::Serve => bail!("serve runs a server and has no one-shot output"),
    }

    Ok(out)
}
