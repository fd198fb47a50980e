//! Shard discovery and the on-disk index cache.
//!
//! A Doxygen site splits its search table into one shard per leading character
//! (`search/all_61.js`, `search/all_62.js`, ...). This module finds the shards of
//! one category under a directory, merges them into a single table, and keeps a
//! `postcard` copy of the merged table keyed by a fingerprint of the shard files
//! so later runs can skip parsing.

use crate::error::Result;
use crate::search::{Entry, RawEntry, SymbolIndexTable, shard_name};
use anyhow::{Context, bail};
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::{Xxh3, xxh3_64};

/// Shard category holding every kind of symbol.
pub const DEFAULT_CATEGORY: &str = "all";

/// Bumped whenever the cached layout changes.
const CACHE_VERSION: u32 = 1;

/// Finds the shard files of `category` under `dir`, in path order.
///
/// Both the JavaScript form (`all_63.js`) and the JSON form (`all_63.json`)
/// are picked up. Ignore files are not honored: generated documentation is
/// routinely gitignored.
pub fn discover_shards(dir: &Path, category: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("Search directory {} does not exist", dir.display());
    }

    let mut shards: Vec<PathBuf> = WalkBuilder::new(dir)
        .standard_filters(false)
        .build()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_some_and(|t| t.is_file()))
        .map(ignore::DirEntry::into_path)
        .filter(|path| is_shard_of(path, category))
        .collect();

    shards.sort();
    tracing::debug!(
        "Found {} '{}' shards under {}",
        shards.len(),
        category,
        dir.display()
    );
    Ok(shards)
}

fn is_shard_of(path: &Path, category: &str) -> bool {
    let has_shard_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == "js" || ext == "json");

    has_shard_extension
        && path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(shard_name)
            .is_some_and(|(found, _)| found == category)
}

/// Hashes the shard files in order, relative paths included, so the digest
/// survives moving the documentation tree.
pub fn fingerprint(dir: &Path, shards: &[PathBuf]) -> Result<u64> {
    let mut hasher = Xxh3::new();
    for path in shards {
        let rel_path = path.strip_prefix(dir).unwrap_or(path);
        hasher.update(rel_path.to_string_lossy().as_bytes());
        hasher.update(&[0]);

        let content =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        hasher.update(&(content.len() as u64).to_le_bytes());
        hasher.update(&content);
    }
    Ok(hasher.digest())
}

/// Parses one shard file according to its extension.
pub fn load_shard(path: &Path) -> Result<SymbolIndexTable> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read shard {}", path.display()))?;

    let table = if path.extension().is_some_and(|ext| ext == "json") {
        SymbolIndexTable::from_json(&source)
    } else {
        SymbolIndexTable::from_js(&source)
    };
    table.with_context(|| format!("Failed to load shard {}", path.display()))
}

/// Loads and merges every shard of `category` under `dir`.
pub fn load_dir(dir: &Path, category: &str) -> Result<SymbolIndexTable> {
    let shards = discover_shards(dir, category)?;
    build(dir, category, &shards)
}

fn build(dir: &Path, category: &str, shards: &[PathBuf]) -> Result<SymbolIndexTable> {
    if shards.is_empty() {
        bail!(
            "No '{}_*.js' search shards found under {}",
            category,
            dir.display()
        );
    }

    let start = std::time::Instant::now();
    let tables = shards
        .iter()
        .map(|path| load_shard(path))
        .collect::<Result<Vec<_>>>()?;
    let table = SymbolIndexTable::merge(tables);

    tracing::info!(
        "Loaded {} symbols ({} occurrences) from {} shards in {:?}",
        table.len(),
        table.occurrence_count(),
        shards.len(),
        start.elapsed()
    );
    Ok(table)
}

/// Loads the merged table, going through `cache` when one is given.
///
/// A cache written for the same shard fingerprint is used as-is. Otherwise the
/// shards are parsed and the cache rewritten; failing to write it only logs a
/// warning.
pub fn load_or_build(
    dir: &Path,
    category: &str,
    cache: Option<&IndexCache>,
) -> Result<SymbolIndexTable> {
    let shards = discover_shards(dir, category)?;
    let Some(cache) = cache else {
        return build(dir, category, &shards);
    };

    let fingerprint = fingerprint(dir, &shards)?;
    if let Some(table) = cache.read(fingerprint) {
        tracing::debug!(
            "Using cached index {} ({} symbols)",
            cache.path().display(),
            table.len()
        );
        return Ok(table);
    }

    let table = build(dir, category, &shards)?;
    if let Err(e) = cache.write(fingerprint, &table) {
        tracing::warn!("Failed to write index cache: {:#}", e);
    }
    Ok(table)
}

#[derive(Serialize, Deserialize)]
struct CachedIndex {
    version: u32,
    fingerprint: u64,
    entries: Vec<Entry>,
}

/// A single cache file holding one merged table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexCache {
    path: PathBuf,
}

impl IndexCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Cache file under the user cache directory, named after the search
    /// directory so different sites do not evict each other.
    pub fn default_for(dir: &Path) -> Option<Self> {
        let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        let name = format!("{:016x}.index", xxh3_64(dir.to_string_lossy().as_bytes()));
        dirs::cache_dir().map(|cache| Self::new(cache.join("doxysearch").join(name)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the cached table if it was written for `fingerprint`.
    ///
    /// Entries are validated again as if freshly loaded. Stale, unreadable or
    /// invalid cache files are deleted.
    pub fn read(&self, fingerprint: u64) -> Option<SymbolIndexTable> {
        let bytes = fs::read(&self.path).ok()?;

        match postcard::from_bytes::<CachedIndex>(&bytes) {
            Ok(cached) if cached.version == CACHE_VERSION && cached.fingerprint == fingerprint => {
                match SymbolIndexTable::load(cached.entries.into_iter().map(RawEntry::from)) {
                    Ok(table) => Some(table),
                    Err(e) => {
                        tracing::warn!(
                            "Cached index at {} is invalid, will rebuild: {}",
                            self.path.display(),
                            e
                        );
                        let _ = fs::remove_file(&self.path);
                        None
                    }
                }
            }
            Ok(_) => {
                tracing::info!(
                    "Cache stale, will rebuild index (file: {})",
                    self.path.display()
                );
                let _ = fs::remove_file(&self.path);
                None
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to deserialize cached index at {}: {}",
                    self.path.display(),
                    e
                );
                let _ = fs::remove_file(&self.path);
                None
            }
        }
    }

    /// Writes `table` to the cache file, replacing it atomically.
    pub fn write(&self, fingerprint: u64, table: &SymbolIndexTable) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let cached = CachedIndex {
            version: CACHE_VERSION,
            fingerprint,
            entries: table.entries().to_vec(),
        };
        let bytes = postcard::to_allocvec(&cached).context("Failed to serialize index")?;

        let tmp = self.path.with_extension("index.tmp");
        fs::write(&tmp, bytes).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to move index into {}", self.path.display()))?;

        tracing::debug!("Cached search index to {}", self.path.display());
        Ok(())
    }
}
