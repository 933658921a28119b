//! Use-case services over the entry repository.
//!
//! # Responsibility
//! - Provide entry CRUD/list/search and calendar resolution entry points.
//! - Keep write-path policy (defaults, validation, read-back) in one place.

pub mod calendar_service;
pub mod entry_service;
