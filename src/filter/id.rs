//! Unique filter identifier assignment.

use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use thiserror::Error;

use crate::config::FilterEntry;

use super::USER_FILTER_ID;

/// The counter reached the largest representable identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No filter identifiers left to assign")]
pub struct IdsExhausted;

/// Returns `true` if `id` may belong to a configured filter.
///
/// Valid identifiers are positive and leave room for the counter to move
/// past them, so `i64::MAX` is never valid.
#[must_use]
pub const fn is_assignable(id: i64) -> bool {
    id > USER_FILTER_ID && id < i64::MAX
}

/// Counter handing out filter identifiers.
///
/// Starts at the current Unix time so identifiers from earlier installs are
/// unlikely to collide, then is moved past every identifier it is shown.
/// Independent of the configuration lock: concurrent callers of
/// [`next`](Self::next) always receive distinct values.
#[derive(Debug)]
pub struct FilterIdAllocator {
    next: AtomicI64,
}

impl FilterIdAllocator {
    /// Creates an allocator whose first identifier is `first`.
    ///
    /// Values below 1 are raised to 1 so the reserved identifier is never
    /// handed out.
    #[must_use]
    pub fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first.max(USER_FILTER_ID + 1)),
        }
    }

    /// Creates an allocator seeded from the wall clock.
    #[must_use]
    pub fn from_clock() -> Self {
        Self::starting_at(Utc::now().timestamp())
    }

    /// Moves the counter past every valid identifier in `filters`.
    ///
    /// Never decreases the counter, so repeated calls are harmless.
    /// Identifiers that fail [`is_assignable`] are skipped; they are
    /// replaced by [`reassign_conflicts`](Self::reassign_conflicts).
    pub fn seed<'a>(&self, filters: impl IntoIterator<Item = &'a FilterEntry>) {
        for filter in filters {
            if is_assignable(filter.id) {
                self.next.fetch_max(filter.id + 1, Ordering::SeqCst);
            }
        }
    }

    /// Returns a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdsExhausted`] once the counter reaches `i64::MAX`; the
    /// counter never wraps.
    pub fn next(&self) -> Result<i64, IdsExhausted> {
        self.next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_add(1))
            .map_err(|_| IdsExhausted)
    }

    /// Returns the identifier the next call to [`next`](Self::next) would yield.
    #[must_use]
    pub fn peek(&self) -> i64 {
        self.next.load(Ordering::SeqCst)
    }

    /// Gives a fresh identifier to every entry whose identifier is not
    /// [assignable](is_assignable) or repeats an earlier entry's identifier.
    ///
    /// Seed the allocator first. Returns the number of entries changed.
    ///
    /// # Errors
    ///
    /// Returns [`IdsExhausted`] if the counter runs out.
    pub fn reassign_conflicts(
        &self,
        filters: &mut [FilterEntry],
    ) -> Result<usize, IdsExhausted> {
        let mut seen = HashSet::with_capacity(filters.len());
        let mut changed = 0;
        for filter in filters.iter_mut() {
            if !is_assignable(filter.id) || !seen.insert(filter.id) {
                let old = filter.id;
                filter.id = self.next()?;
                seen.insert(filter.id);
                tracing::debug!(url = %filter.url, old, new = filter.id, "Reassigned filter id");
                changed += 1;
            }
        }
        Ok(changed)
    }
}
