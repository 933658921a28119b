//! Diary entry domain model.
//!
//! # Responsibility
//! - Define the canonical entry record and its tag vocabularies.
//! - Provide validation shared by create and edit write paths.
//!
//! # Invariants
//! - `id` is stable and never reused for another entry.
//! - `created_at` is immutable after creation; edits touch `updated_at`.
//! - `diary_date` is the day the entry is about, not the day it was saved.

use crate::model::document::Document;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a diary entry.
pub type EntryId = Uuid;

/// Mood tag attached to every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Peaceful,
    Excited,
    Tired,
}

impl Emotion {
    /// Every emotion in display order.
    pub const ALL: [Emotion; 6] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Peaceful,
        Emotion::Excited,
        Emotion::Tired,
    ];

    /// Returns the stable storage/wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Peaceful => "peaceful",
            Self::Excited => "excited",
            Self::Tired => "tired",
        }
    }

    /// Parses a stored value; `None` for anything outside the vocabulary.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    /// Display icon used by entry cards.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Happy => "😊",
            Self::Sad => "😢",
            Self::Angry => "😠",
            Self::Peaceful => "😌",
            Self::Excited => "🤗",
            Self::Tired => "😫",
        }
    }
}

/// Weather tag attached to every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    Windy,
}

impl Weather {
    /// Every weather value in display order.
    pub const ALL: [Weather; 5] = [
        Weather::Sunny,
        Weather::Cloudy,
        Weather::Rainy,
        Weather::Snowy,
        Weather::Windy,
    ];

    /// Returns the stable storage/wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
            Self::Snowy => "snowy",
            Self::Windy => "windy",
        }
    }

    /// Parses a stored value; `None` for anything outside the vocabulary.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    /// Display icon used by entry cards.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Sunny => "☀️",
            Self::Cloudy => "☁️",
            Self::Rainy => "🌧️",
            Self::Snowy => "🌨️",
            Self::Windy => "💨",
        }
    }
}

/// Validation failure for entry write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    /// Title is empty or whitespace-only; search matching needs a title.
    EmptyTitle,
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "entry title must not be empty"),
        }
    }
}

impl Error for EntryValidationError {}

/// One persisted diary record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Stable server-assigned id.
    pub id: EntryId,
    /// Entry title; required non-empty.
    pub title: String,
    /// Rich-text content tree.
    pub content: Document,
    /// Mood tag.
    pub emotion: Emotion,
    /// Weather tag.
    pub weather: Weather,
    /// Creation time in epoch milliseconds. Immutable.
    pub created_at: i64,
    /// Last update time in epoch milliseconds.
    pub updated_at: i64,
    /// Calendar day this entry is about.
    pub diary_date: NaiveDate,
}

/// Field set for creating one entry. The id and timestamps are assigned
/// by storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub title: String,
    pub content: Document,
    pub emotion: Emotion,
    pub weather: Weather,
    pub diary_date: NaiveDate,
}

impl NewEntry {
    /// Validates fields shared with the edit path.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        validate_title(&self.title)
    }
}

/// Full-replacement field set for editing one entry.
///
/// Edits replace every user-editable field; id and `created_at` are out
/// of reach by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryChanges {
    pub title: String,
    pub content: Document,
    pub emotion: Emotion,
    pub weather: Weather,
    pub diary_date: NaiveDate,
}

impl EntryChanges {
    /// Validates fields shared with the create path.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        validate_title(&self.title)
    }
}

fn validate_title(title: &str) -> Result<(), EntryValidationError> {
    if title.trim().is_empty() {
        return Err(EntryValidationError::EmptyTitle);
    }
    Ok(())
}
