//! Error handling types and utilities.

use std::fmt;

/// A specialized Result type for doxysearch application plumbing.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods in the cache, CLI, and server layers. Table loading
/// itself reports the typed [`LoadError`].
pub type Result<T> = anyhow::Result<T>;

/// Error returned when a search table cannot be loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// A row of the table is missing a required part or has the wrong shape.
    #[error("malformed entry #{index}: {reason}")]
    MalformedEntry { index: usize, reason: Malformation },
    /// The shard source could not be tokenized.
    #[error("invalid search data at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },
}

impl LoadError {
    pub(crate) const fn malformed(index: usize, reason: Malformation) -> Self {
        Self::MalformedEntry { index, reason }
    }

    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }
}

/// What exactly is wrong with a malformed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformation {
    MissingKey,
    MissingLabel,
    NoOccurrences,
    /// The occurrence at this position has no anchor URL.
    MissingAnchor { occurrence: usize },
    /// The key contains characters the Doxygen id escaping never produces.
    ///
    /// Newer Doxygen releases append a `_<n>` disambiguator to repeated keys
    /// (`cli_0`); such keys are not produced by the escaping alone and are
    /// rejected here as well.
    KeyNotNormalized,
    /// The row is not laid out as `[key, [label, occurrence...]]`.
    UnexpectedShape(&'static str),
}

impl fmt::Display for Malformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKey => write!(f, "missing key"),
            Self::MissingLabel => write!(f, "missing label"),
            Self::NoOccurrences => write!(f, "no occurrences"),
            Self::MissingAnchor { occurrence } => {
                write!(f, "occurrence {} has no anchor", occurrence)
            }
            Self::KeyNotNormalized => write!(f, "key is not in normalized form"),
            Self::UnexpectedShape(what) => write!(f, "unexpected shape: {}", what),
        }
    }
}
