//! The immutable symbol table and its prefix search.

use crate::error::LoadError;
use ahash::{AHashMap, AHashSet};
use rapidfuzz::distance::jaro_winkler;
use std::iter::FusedIterator;

use super::entry::{Entry, Occurrence, RawEntry};
use super::{key, shard};

/// A sorted, read-only table of documented symbols.
///
/// Entries are ordered by normalized key and keys are unique: rows sharing a key
/// are merged at load time, their occurrences concatenated in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolIndexTable {
    entries: Vec<Entry>,
}

impl SymbolIndexTable {
    /// Validates raw rows and builds a table from them.
    ///
    /// Fails on the first row lacking a key, a label or an occurrence. Rows need
    /// not be sorted.
    pub fn load(rows: impl IntoIterator<Item = RawEntry>) -> Result<Self, LoadError> {
        let entries = rows
            .into_iter()
            .enumerate()
            .map(|(index, raw)| Entry::from_raw(index, raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_entries(entries))
    }

    /// Loads a table from the JavaScript source of a search shard.
    pub fn from_js(source: &str) -> Result<Self, LoadError> {
        Self::load(shard::parse_shard(source)?)
    }

    /// Loads a table from its tagged-record JSON form.
    pub fn from_json(source: &str) -> Result<Self, LoadError> {
        Self::load(shard::parse_json(source)?)
    }

    /// Combines several tables, typically one per shard, into one.
    ///
    /// An occurrence already contributed under the same key by an earlier table
    /// is dropped, so merging the same shard twice adds nothing. Occurrences
    /// within one table are never dropped.
    pub fn merge(tables: impl IntoIterator<Item = Self>) -> Self {
        let mut seen: AHashMap<String, AHashSet<Occurrence>> = AHashMap::new();
        let mut entries = Vec::new();

        for table in tables {
            let mut contributed = Vec::with_capacity(table.entries.len());
            for mut entry in table.entries {
                if let Some(earlier) = seen.get(&entry.key) {
                    entry.occurrences.retain(|occ| !earlier.contains(occ));
                    if entry.occurrences.is_empty() {
                        continue;
                    }
                }
                contributed.push((entry.key.clone(), entry.occurrences.clone()));
                entries.push(entry);
            }

            for (key, occurrences) in contributed {
                seen.entry(key).or_default().extend(occurrences);
            }
        }

        Self::from_entries(entries)
    }

    /// Sorts already-validated entries and folds duplicate keys together.
    pub(crate) fn from_entries(mut entries: Vec<Entry>) -> Self {
        let rows = entries.len();

        if !entries.is_sorted_by(|a, b| a.key <= b.key) {
            tracing::debug!("Sorting {} unsorted search rows", rows);
            // Stable, so rows with equal keys keep their input order
            entries.sort_by(|a, b| a.key.cmp(&b.key));
        }

        let mut merged: Vec<Entry> = Vec::with_capacity(entries.len());
        for entry in entries {
            match merged.last_mut() {
                Some(last) if last.key == entry.key => {
                    if last.label != entry.label {
                        tracing::trace!(
                            "Key '{}' has labels '{}' and '{}', keeping the first",
                            entry.key,
                            last.label,
                            entry.label
                        );
                    }
                    last.occurrences.extend(entry.occurrences);
                }
                _ => merged.push(entry),
            }
        }

        tracing::debug!(
            "Built symbol table: {} rows folded into {} entries",
            rows,
            merged.len()
        );

        Self { entries: merged }
    }

    /// Returns the entries whose key starts with the normalized `prefix`.
    ///
    /// Matching is case-insensitive and an empty (or all-space) prefix matches
    /// nothing. Results come back in table order. The returned iterator is lazy;
    /// clone it to walk the same matches again.
    pub fn search(&self, prefix: &str) -> Matches<'_> {
        let needle = key::normalize_query(prefix);
        let start = if needle.is_empty() {
            self.entries.len()
        } else {
            self.entries
                .partition_point(|entry| entry.key.as_str() < needle.as_str())
        };

        Matches {
            remaining: &self.entries[start..],
            needle,
        }
    }

    /// Looks up the entry for exactly this symbol name.
    pub fn get(&self, symbol: &str) -> Option<&Entry> {
        let needle = key::normalize_query(symbol);
        self.entries
            .binary_search_by(|entry| entry.key.as_str().cmp(needle.as_str()))
            .ok()
            .map(|index| &self.entries[index])
    }

    /// Ranks entries by similarity to `query`, best first.
    ///
    /// Meant for "did you mean" hints when [`search`](Self::search) comes back
    /// empty. Ties keep table order.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<Suggestion<'_>> {
        let needle = key::normalize_query(query);
        if needle.is_empty() || limit == 0 {
            return vec![];
        }

        let mut suggestions: Vec<_> = self
            .entries
            .iter()
            .map(|entry| Suggestion {
                entry,
                score: jaro_winkler::similarity(needle.chars(), entry.key.chars()),
            })
            .filter(|suggestion| suggestion.score > 0.0)
            .collect();

        suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
        suggestions.truncate(limit);
        suggestions
    }

    /// All entries in key order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of occurrences across all entries.
    pub fn occurrence_count(&self) -> usize {
        self.entries.iter().map(|e| e.occurrences.len()).sum()
    }
}

impl<'a> IntoIterator for &'a SymbolIndexTable {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator over the entries matching a prefix.
#[derive(Debug, Clone)]
pub struct Matches<'a> {
    remaining: &'a [Entry],
    needle: String,
}

impl Matches<'_> {
    /// The normalized form of the prefix being matched.
    pub fn needle(&self) -> &str {
        &self.needle
    }
}

impl<'a> Iterator for Matches<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        let (first, rest) = self.remaining.split_first()?;
        if first.key.starts_with(self.needle.as_str()) {
            self.remaining = rest;
            Some(first)
        } else {
            // Keys are sorted, so nothing further can match
            self.remaining = &[];
            None
        }
    }
}

impl FusedIterator for Matches<'_> {}

/// An entry proposed as a near miss, with its similarity score in `0.0..=1.0`.
#[derive(Debug, Clone, Copy)]
pub struct Suggestion<'a> {
    pub entry: &'a Entry,
    pub score: f64,
}
