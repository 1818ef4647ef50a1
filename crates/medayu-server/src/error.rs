//! Content error types for the manager backend.
//!
//! [`ContentError`] is the unified error type of the lifecycle service. Most
//! variants are validation outcomes that handlers turn into a redirect with a
//! one-shot message; [`ContentError::is_internal`] picks out the store and
//! filesystem faults that are logged and reported generically instead.

use medayu_core::{CoreError, Ordinal, MAX_SLIDES};
use medayu_storage::StorageError;

/// Message shown for every internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// No manager is bound to the session.
    #[error("not signed in")]
    Unauthenticated,

    /// A required form field was absent or blank.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// The multipart or urlencoded body could not be read.
    #[error("malformed form: {0}")]
    MalformedForm(String),

    /// The upload's declared media type is not an accepted image format.
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// The requested ordinal is held by another slide.
    #[error("ordinal {0} is already used")]
    OrdinalConflict(Ordinal),

    /// The ordinal parsed but is outside `1..=8`.
    #[error("ordinal {0} is out of range")]
    OrdinalOutOfRange(i64),

    /// The carousel already has the maximum number of slides.
    #[error("carousel is full")]
    CapacityExceeded,

    /// The addressed record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Unknown email or wrong password at login.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The current password given on password change did not verify.
    #[error("current password is incorrect")]
    WrongPassword,

    /// The new password fails the password policy.
    #[error("weak password: {0}")]
    WeakPassword(&'static str),

    /// The password confirmation differs from the new password.
    #[error("password confirmation does not match")]
    PasswordMismatch,

    /// The store failed.
    #[error("store failure: {0}")]
    Store(StorageError),

    /// Writing, converting or removing an image failed.
    #[error("filesystem failure: {0}")]
    FileSystem(String),

    /// Any other unexpected failure (e.g. the hashing primitive).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ContentError {
    /// Store and filesystem faults; everything else is a validation outcome.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ContentError::Store(_) | ContentError::FileSystem(_) | ContentError::Internal(_)
        )
    }

    /// The one-shot message shown to the manager.
    pub fn user_message(&self) -> String {
        match self {
            ContentError::Unauthenticated => "You do not have access to this page".to_string(),
            ContentError::MissingField(field) => format!("{} is required", field_label(field)),
            ContentError::MalformedForm(_) => "The submitted form could not be read".to_string(),
            ContentError::UnsupportedMediaType(_) => {
                "Only JPG, PNG and WEBP images are allowed".to_string()
            }
            ContentError::OrdinalConflict(ordinal) => {
                format!("Position {} is already used", ordinal)
            }
            ContentError::OrdinalOutOfRange(_) => {
                format!("Position must be between 1 and {}", MAX_SLIDES)
            }
            ContentError::CapacityExceeded => format!(
                "The carousel already has {} photos; delete one first",
                MAX_SLIDES
            ),
            ContentError::NotFound(_) => "Data not found".to_string(),
            ContentError::InvalidCredentials => "Email or password incorrect".to_string(),
            ContentError::WrongPassword => "Current password is incorrect".to_string(),
            ContentError::WeakPassword(reason) => format!("New password {}", reason),
            ContentError::PasswordMismatch => {
                "Password confirmation does not match".to_string()
            }
            ContentError::Store(_) | ContentError::FileSystem(_) | ContentError::Internal(_) => {
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        }
    }
}

fn field_label(field: &str) -> &str {
    match field {
        "image" | "photo" => "Photo",
        "ordinal" => "Position",
        "name" => "Name",
        "title" => "Title",
        "body" => "Content",
        "email" => "Email",
        "password" => "Password",
        "current_password" => "Current password",
        "new_password" => "New password",
        "confirm_password" => "Password confirmation",
        other => other,
    }
}

impl From<CoreError> for ContentError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidOrdinal { .. } => ContentError::MissingField("ordinal"),
            CoreError::OrdinalOutOfRange { value, .. } => ContentError::OrdinalOutOfRange(value),
            CoreError::UnsupportedMediaType { declared } => {
                ContentError::UnsupportedMediaType(declared)
            }
            CoreError::WeakPassword { reason } => ContentError::WeakPassword(reason),
            CoreError::Hashing(msg) => ContentError::Internal(msg),
        }
    }
}

impl From<StorageError> for ContentError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::OrdinalTaken(ordinal) => ContentError::OrdinalConflict(ordinal),
            StorageError::CapacityExceeded { .. } => ContentError::CapacityExceeded,
            StorageError::SlideNotFound(_)
            | StorageError::ProfileNotFound { .. }
            | StorageError::AnnouncementNotFound(_)
            | StorageError::ManagerNotFound(_) => ContentError::NotFound(err.to_string()),
            other => ContentError::Store(other),
        }
    }
}

impl From<std::io::Error> for ContentError {
    fn from(err: std::io::Error) -> Self {
        ContentError::FileSystem(err.to_string())
    }
}
