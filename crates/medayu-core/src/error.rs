//! Core error types for medayu-core.
//!
//! Uses `thiserror` for structured, matchable variants covering input that
//! fails domain validation before anything touches storage or disk.

use thiserror::Error;

/// Validation errors produced by the domain layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A carousel ordinal was absent or not an integer.
    #[error("ordinal is missing or not a number: '{raw}'")]
    InvalidOrdinal { raw: String },

    /// A carousel ordinal parsed but falls outside `1..=8`.
    #[error("ordinal {value} is outside 1..={max}")]
    OrdinalOutOfRange { value: i64, max: u8 },

    /// A declared upload media type is not an accepted image format.
    #[error("unsupported media type: '{declared}'")]
    UnsupportedMediaType { declared: String },

    /// A new password does not satisfy the password policy.
    #[error("weak password: {reason}")]
    WeakPassword { reason: &'static str },

    /// The bcrypt primitive failed (malformed hash, bad cost).
    #[error("password hashing failed: {0}")]
    Hashing(String),
}
