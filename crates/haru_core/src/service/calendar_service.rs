//! Calendar date index and disambiguation resolution.
//!
//! # Responsibility
//! - Derive the sorted set of diary dates that have at least one entry.
//! - Resolve one picked date to zero, one, or many entries.
//!
//! # Invariants
//! - The date index contains each date at most once, ascending.
//! - A date with multiple entries always resolves to `Ambiguous`; the
//!   choice between candidates belongs to the user, never this service.
//! - Store failures propagate; an error is never reshaped into an empty
//!   result.

use crate::model::entry::{Entry, EntryId};
use crate::repo::entry_repo::{EntryRepository, RepoResult};
use chrono::NaiveDate;

/// Outcome of resolving one picked diary date.
#[derive(Debug, Clone, PartialEq)]
pub enum DateResolution {
    /// No entry exists for the date; the caller shows a notice.
    NoEntry { date: NaiveDate },
    /// Exactly one entry; the caller navigates straight to it.
    Resolved { entry_id: EntryId },
    /// Two or more entries, newest first; the caller prompts a choice.
    Ambiguous {
        date: NaiveDate,
        candidates: Vec<Entry>,
    },
}

/// Calendar service facade over repository implementations.
pub struct CalendarService<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> CalendarService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns every diary date with at least one entry, distinct and
    /// ascending. The full set is always returned; there is no paging.
    pub fn list_diary_dates(&self) -> RepoResult<Vec<NaiveDate>> {
        self.repo.list_diary_dates()
    }

    /// Resolves one picked date against the entry collection.
    ///
    /// # Contract
    /// - 0 matches: `NoEntry`.
    /// - 1 match: `Resolved` with that entry's id.
    /// - 2+ matches: `Ambiguous` carrying every candidate ordered by
    ///   creation time descending. Dismissing the resulting prompt is a
    ///   caller concern; this call has no side effect to undo.
    pub fn resolve_diary_date(&self, date: NaiveDate) -> RepoResult<DateResolution> {
        let mut matches = self.repo.list_by_diary_date(date)?;

        Ok(match matches.len() {
            0 => DateResolution::NoEntry { date },
            1 => DateResolution::Resolved {
                entry_id: matches.remove(0).id,
            },
            _ => DateResolution::Ambiguous {
                date,
                candidates: matches,
            },
        })
    }
}
