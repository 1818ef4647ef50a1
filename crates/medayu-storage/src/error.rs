//! Storage error types for medayu-storage.
//!
//! [`StorageError`] covers all anticipated failure modes in the storage layer:
//! driver and migration failures, per-family not-found variants, and the
//! carousel constraints (ordinal uniqueness, slide capacity).

use medayu_core::{AnnouncementId, ManagerId, Ordinal, ProfileId, ProfileKind, SlideId};
use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The SQLite driver reported an error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// A carousel slide with the given ID was not found.
    #[error("slide not found: {0}")]
    SlideNotFound(SlideId),

    /// A profile of the given kind and ID was not found.
    #[error("{kind} entry not found: {id}")]
    ProfileNotFound { kind: ProfileKind, id: ProfileId },

    /// An announcement with the given ID was not found.
    #[error("announcement not found: {0}")]
    AnnouncementNotFound(AnnouncementId),

    /// A manager with the given ID was not found.
    #[error("manager not found: {0}")]
    ManagerNotFound(ManagerId),

    /// Another slide already holds this ordinal.
    #[error("ordinal {0} is already taken")]
    OrdinalTaken(Ordinal),

    /// The carousel already holds the maximum number of slides.
    #[error("carousel is full ({max} slides)")]
    CapacityExceeded { max: u8 },

    /// A manager with this email already exists.
    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    /// A stored value violates a domain invariant.
    #[error("integrity error: {reason}")]
    IntegrityError { reason: String },
}
