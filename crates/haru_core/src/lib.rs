//! Core domain logic for the haru journaling app.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod extract;
pub mod logging;
pub mod media;
pub mod model;
pub mod repo;
pub mod service;

pub use extract::{extract_preview, find_first_image, DEFAULT_PREVIEW_CHARS};
pub use logging::{default_log_level, init_logging, logging_status};
pub use media::{
    validate_image_upload, FsImageStore, ImageStore, ImageStoreError, StoredImage,
    MAX_IMAGE_BYTES,
};
pub use model::document::{Document, Node, NodeKind};
pub use model::entry::{
    Emotion, Entry, EntryChanges, EntryId, EntryValidationError, NewEntry, Weather,
};
pub use repo::entry_repo::{
    EntryListQuery, EntryRepository, RepoError, RepoResult, SqliteEntryRepository,
};
pub use service::calendar_service::{CalendarService, DateResolution};
pub use service::entry_service::{
    CreateEntryRequest, EntryCard, EntryService, EntryServiceError,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
