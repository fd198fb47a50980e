//! Index rows: validated entries and the raw rows they are built from.

use crate::error::{LoadError, Malformation};
use serde::{Deserialize, Serialize};

use super::key;

/// One documented symbol in the search table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Normalized symbol-name fragment, the sort and search key
    pub key: String,
    /// Display name of the symbol
    pub label: String,
    /// Every documentation location mentioning the symbol, never empty
    pub occurrences: Vec<Occurrence>,
}

impl Entry {
    /// The key with its escapes undone, e.g. `cli_2eh` → `cli.h`.
    pub fn decoded_key(&self) -> String {
        key::decode(&self.key)
    }

    /// Validates a raw row, reporting problems against row `index`.
    pub(crate) fn from_raw(index: usize, raw: RawEntry) -> Result<Self, LoadError> {
        let malformed = |reason| LoadError::malformed(index, reason);

        let key = raw
            .key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| malformed(Malformation::MissingKey))?;
        if !key::is_normalized(&key) {
            return Err(malformed(Malformation::KeyNotNormalized));
        }

        let label = raw
            .label
            .filter(|l| !l.is_empty())
            .ok_or_else(|| malformed(Malformation::MissingLabel))?;

        if raw.occurrences.is_empty() {
            return Err(malformed(Malformation::NoOccurrences));
        }
        if let Some(position) = raw.occurrences.iter().position(|o| o.anchor.is_empty()) {
            return Err(malformed(Malformation::MissingAnchor {
                occurrence: position,
            }));
        }

        Ok(Self {
            key,
            label,
            occurrences: raw.occurrences,
        })
    }
}

/// One documentation location where a symbol appears.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occurrence {
    /// Relative URL of the page, optionally with a `#fragment`
    pub anchor: String,
    /// Scope text, HTML-escaped as the generator wrote it
    pub description: String,
    /// Whether the link targets the parent frame
    #[serde(default)]
    pub open_in_parent: bool,
}

impl Occurrence {
    /// The description with HTML entities decoded into plain text.
    ///
    /// Non-breaking spaces become regular spaces.
    pub fn scope_text(&self) -> String {
        decode_entities(&self.description)
    }

    /// The source file named after `:&#160;` in file-scoped descriptions.
    ///
    /// `check_status(...):&#160;fileutils.cpp` yields `fileutils.cpp`.
    pub fn defined_in(&self) -> Option<&str> {
        self.description
            .rsplit_once(":&#160;")
            .map(|(_, file)| file.trim())
            .filter(|file| !file.is_empty())
    }

    /// The page part of the anchor, without any `#fragment`.
    pub fn page(&self) -> &str {
        self.anchor
            .split_once('#')
            .map_or(self.anchor.as_str(), |(page, _)| page)
    }
}

/// A table row as read from a shard, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub occurrences: Vec<Occurrence>,
}

impl RawEntry {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            label: Some(label.into()),
            occurrences: Vec::new(),
        }
    }

    /// Appends an occurrence, builder style.
    pub fn occurrence(mut self, anchor: impl Into<String>, description: impl Into<String>) -> Self {
        self.occurrences.push(Occurrence {
            anchor: anchor.into(),
            description: description.into(),
            open_in_parent: false,
        });
        self
    }
}

impl From<Entry> for RawEntry {
    fn from(entry: Entry) -> Self {
        Self {
            key: Some(entry.key),
            label: Some(entry.label),
            occurrences: entry.occurrences,
        }
    }
}

/// Decodes the handful of HTML entities Doxygen writes into descriptions.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        let decoded = candidate
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_entity(&candidate[1..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &candidate[end + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            // &#160; is a non-breaking space
            if value == 160 {
                Some(' ')
            } else {
                char::from_u32(value)
            }
        }
    }
}
