//! Filter source deduplication.

use std::collections::HashSet;

use crate::config::FilterEntry;

/// Result of [`dedupe`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deduplicated {
    /// Surviving entries, in order of first occurrence.
    pub kept: Vec<FilterEntry>,

    /// Later entries whose URL was already seen, in input order.
    pub dropped: Vec<FilterEntry>,
}

/// Keeps the first entry for each URL and drops the rest.
///
/// A stable filter, not a sort: survivors keep their relative order.
/// Duplicates are not an error; they are returned in
/// [`Deduplicated::dropped`] for the caller to report.
#[must_use]
pub fn dedupe(entries: Vec<FilterEntry>) -> Deduplicated {
    let mut seen: HashSet<String> = HashSet::with_capacity(entries.len());
    let mut result = Deduplicated {
        kept: Vec::with_capacity(entries.len()),
        dropped: Vec::new(),
    };

    for entry in entries {
        if seen.contains(entry.url.as_str()) {
            result.dropped.push(entry);
        } else {
            seen.insert(entry.url.clone());
            result.kept.push(entry);
        }
    }

    result
}
