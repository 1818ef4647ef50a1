//! Manager password policy and bcrypt hashing.
//!
//! Stored hashes are bcrypt so accounts created by the previous site
//! (`$2a$` prefix) keep working.

use crate::error::CoreError;

/// bcrypt work factor for newly written hashes.
pub const HASH_COST: u32 = 10;

/// Minimum accepted password length, in characters.
pub const MIN_LENGTH: usize = 6;

/// Checks a candidate password against the policy.
///
/// Rules are checked in a fixed order so the first failure is the one the
/// form reports: length, uppercase, lowercase, digit.
pub fn check_policy(candidate: &str) -> Result<(), CoreError> {
    if candidate.chars().count() < MIN_LENGTH {
        return Err(CoreError::WeakPassword {
            reason: "must be at least 6 characters",
        });
    }
    if !candidate.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(CoreError::WeakPassword {
            reason: "must contain an uppercase letter",
        });
    }
    if !candidate.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(CoreError::WeakPassword {
            reason: "must contain a lowercase letter",
        });
    }
    if !candidate.chars().any(|c| c.is_ascii_digit()) {
        return Err(CoreError::WeakPassword {
            reason: "must contain a digit",
        });
    }
    Ok(())
}

/// Hashes a password for storage.
pub fn hash(password: &str) -> Result<String, CoreError> {
    bcrypt::hash(password, HASH_COST).map_err(|e| CoreError::Hashing(e.to_string()))
}

/// Verifies a password against a stored hash.
///
/// A malformed stored hash is reported as an error rather than a mismatch.
pub fn verify(password: &str, stored_hash: &str) -> Result<bool, CoreError> {
    bcrypt::verify(password, stored_hash).map_err(|e| CoreError::Hashing(e.to_string()))
}
