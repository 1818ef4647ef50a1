//! Storage abstraction for Medayu site content.
//!
//! Provides the [`ContentStore`] trait defining the storage contract that all
//! backends implement, plus the [`InMemoryStore`] and [`SqliteStore`] as
//! first-class backends.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`traits`]: ContentStore trait definition
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: SQL migrations and connection setup
//! - [`sqlite`]: SqliteStore implementation

pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;

#[cfg(test)]
mod conformance;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::ContentStore;
