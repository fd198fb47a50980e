//! Plain-text rendering of symbols for the CLI and MCP tools.

use crate::search::{Entry, Occurrence, Suggestion};
use std::fmt::Write as _;

/// Writes a one-line heading for an entry followed by its locations.
///
/// At most `max_occurrences` locations are listed; the rest are summarized.
pub fn write_entry(out: &mut String, entry: &Entry, max_occurrences: usize) {
    let count = entry.occurrences.len();
    if count == 1 {
        let _ = writeln!(out, "{}", entry.label);
    } else {
        let _ = writeln!(out, "{}  ({} locations)", entry.label, count);
    }

    for occurrence in entry.occurrences.iter().take(max_occurrences) {
        write_occurrence(out, occurrence);
    }
    if count > max_occurrences {
        let _ = writeln!(out, "    … and {} more", count - max_occurrences);
    }
}

/// Writes a single location line: anchor, then scope when there is one.
pub fn write_occurrence(out: &mut String, occurrence: &Occurrence) {
    let scope = occurrence.scope_text();
    if scope.is_empty() {
        let _ = writeln!(out, "  • {}", occurrence.anchor);
    } else {
        let _ = writeln!(out, "  • {}  [{}]", occurrence.anchor, scope);
    }
}

/// Writes a "did you mean" block, or nothing when there are no suggestions.
pub fn write_suggestions(out: &mut String, suggestions: &[Suggestion<'_>]) {
    if suggestions.is_empty() {
        return;
    }
    let _ = writeln!(out, "\nDid you mean:");
    for suggestion in suggestions {
        let _ = writeln!(
            out,
            "  • {} ({:.0}% similar)",
            suggestion.entry.label,
            suggestion.score * 100.0
        );
    }
}
