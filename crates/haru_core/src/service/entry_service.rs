//! Entry use-case service.
//!
//! # Responsibility
//! - Provide entry create/update/get/delete/list APIs.
//! - Derive list-view card projections (preview text, first image).
//! - Normalize search input before it reaches the repository.
//!
//! # Invariants
//! - `update_entry` uses full field replacement semantics.
//! - Listings are always sorted by `created_at DESC, uuid ASC`.
//! - A blank search term behaves exactly like no search term.

use crate::extract::{extract_preview, find_first_image, DEFAULT_PREVIEW_CHARS};
use crate::model::document::Document;
use crate::model::entry::{
    Emotion, Entry, EntryChanges, EntryId, EntryValidationError, NewEntry, Weather,
};
use crate::repo::entry_repo::{EntryListQuery, EntryRepository, RepoError, RepoResult};
use chrono::{NaiveDate, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for entry use-cases.
#[derive(Debug)]
pub enum EntryServiceError {
    /// Entry fields failed validation.
    InvalidEntry(EntryValidationError),
    /// Target entry does not exist.
    EntryNotFound(EntryId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for EntryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEntry(err) => write!(f, "{err}"),
            Self::EntryNotFound(id) => write!(f, "entry not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent entry state: {details}"),
        }
    }
}

impl Error for EntryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEntry(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for EntryServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::InvalidEntry(err),
            RepoError::NotFound(id) => Self::EntryNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Request model for creating one entry.
///
/// `diary_date` defaults to the current UTC day when unset; editing the
/// entry later can move it to any day.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateEntryRequest {
    pub title: String,
    pub content: Document,
    pub emotion: Emotion,
    pub weather: Weather,
    pub diary_date: Option<NaiveDate>,
}

/// List-view projection of one entry.
///
/// Preview fields are derived from the content tree at list time; they
/// are never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryCard {
    pub id: EntryId,
    pub title: String,
    pub emotion: Emotion,
    pub weather: Weather,
    pub diary_date: NaiveDate,
    pub created_at: i64,
    /// Bounded plain-text preview (`None` for image-only/empty content).
    pub preview_text: Option<String>,
    /// First embedded image URL, when the content has one.
    pub preview_image: Option<String>,
}

impl EntryCard {
    /// Projects one entry into its list-view card.
    pub fn from_entry(entry: &Entry) -> Self {
        let preview = extract_preview(&entry.content, DEFAULT_PREVIEW_CHARS);
        Self {
            id: entry.id,
            title: entry.title.clone(),
            emotion: entry.emotion,
            weather: entry.weather,
            diary_date: entry.diary_date,
            created_at: entry.created_at,
            preview_text: if preview.is_empty() {
                None
            } else {
                Some(preview)
            },
            preview_image: find_first_image(&entry.content),
        }
    }
}

/// Entry service facade over repository implementations.
pub struct EntryService<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> EntryService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one entry and returns the stored record.
    ///
    /// # Contract
    /// - `diary_date` falls back to the current UTC day when unset.
    /// - Id and timestamps come from storage; the created row is read
    ///   back so callers see exactly what was persisted.
    pub fn create_entry(&self, request: CreateEntryRequest) -> Result<Entry, EntryServiceError> {
        let entry = NewEntry {
            title: request.title,
            content: request.content,
            emotion: request.emotion,
            weather: request.weather,
            diary_date: request
                .diary_date
                .unwrap_or_else(|| Utc::now().date_naive()),
        };

        let id = self.repo.create_entry(&entry)?;
        self.repo
            .get_entry(id)?
            .ok_or(EntryServiceError::InconsistentState(
                "created entry not found in read-back",
            ))
    }

    /// Replaces every user-editable field of one entry.
    pub fn update_entry(
        &self,
        id: EntryId,
        changes: EntryChanges,
    ) -> Result<Entry, EntryServiceError> {
        self.repo.update_entry(id, &changes)?;
        self.repo
            .get_entry(id)?
            .ok_or(EntryServiceError::InconsistentState(
                "updated entry not found in read-back",
            ))
    }

    /// Gets one entry by stable id.
    pub fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        self.repo.get_entry(id)
    }

    /// Removes one entry permanently.
    pub fn delete_entry(&self, id: EntryId) -> Result<(), EntryServiceError> {
        self.repo.delete_entry(id)?;
        Ok(())
    }

    /// Lists entry cards, newest first, optionally filtered by title.
    ///
    /// # Contract
    /// - An absent or blank term returns the full collection.
    /// - A present term keeps entries whose title contains it as a
    ///   case-insensitive substring; ordering is unchanged.
    pub fn list_entries(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<EntryCard>, EntryServiceError> {
        let query = EntryListQuery {
            title_contains: normalize_search_term(search),
            ..EntryListQuery::default()
        };
        let entries = self.repo.list_entries(&query)?;
        Ok(entries.iter().map(EntryCard::from_entry).collect())
    }
}

/// Normalizes one search term; blank input means "no filter".
pub fn normalize_search_term(term: Option<&str>) -> Option<String> {
    let trimmed = term?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
