//! Domain model for diary entries and their rich-text content.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep one tree-shaped content representation regardless of how the
//!   content was persisted (tree JSON or legacy flat markup).
//!
//! # Invariants
//! - Every entry is identified by a stable `EntryId`.
//! - Deleting an entry is terminal; there is no tombstone state.

pub mod document;
pub mod entry;
pub mod legacy;
