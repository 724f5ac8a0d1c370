//! Filter list hygiene and identity.
//!
//! - [`FilterIdAllocator`]: hands out unique filter identifiers
//! - [`dedupe`]: drops later entries that repeat a source URL
//! - [`user_filter`]: projects the user rules into a synthetic filter
//!
//! Identifier 0 is reserved for the user rules filter; every other entry
//! gets a positive identifier below `i64::MAX` from the allocator.

mod dedupe;
mod id;

#[cfg(test)]
#[path = "dedupe_tests.rs"]
mod dedupe_tests;
#[cfg(test)]
#[path = "id_tests.rs"]
mod id_tests;

pub use dedupe::{Deduplicated, dedupe};
pub use id::{FilterIdAllocator, IdsExhausted, is_assignable};

use crate::config::FilterEntry;

/// Identifier of the synthetic user rules filter.
pub const USER_FILTER_ID: i64 = 0;

/// Builds the filter carrying the user's own rules.
///
/// Contents are each rule followed by a newline. The entry is always
/// enabled; with no rules its contents are empty and the resolver never
/// references it.
#[must_use]
pub fn user_filter(rules: &[String]) -> FilterEntry {
    let mut contents = Vec::with_capacity(rules.iter().map(|r| r.len() + 1).sum());
    for rule in rules {
        contents.extend_from_slice(rule.as_bytes());
        contents.push(b'\n');
    }

    let mut filter = FilterEntry::new(USER_FILTER_ID, "", "", true);
    filter.rules_count = rules.len() as u64;
    filter.contents = Some(contents);
    filter
}
