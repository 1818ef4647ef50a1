//! Accepted upload media types.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Image formats the upload forms accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Jpeg,
    Png,
    Webp,
}

impl MediaType {
    /// Classifies a client-declared `Content-Type`.
    ///
    /// Parameters such as `; charset=` are ignored and the comparison is
    /// case-insensitive. `image/jpg` is accepted as an alias of JPEG since
    /// some browsers still send it.
    pub fn from_declared(declared: &str) -> Result<Self, CoreError> {
        let essence = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" => Ok(MediaType::Jpeg),
            "image/png" => Ok(MediaType::Png),
            "image/webp" => Ok(MediaType::Webp),
            _ => Err(CoreError::UnsupportedMediaType {
                declared: declared.to_string(),
            }),
        }
    }

    /// Canonical MIME string.
    pub fn mime(self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Webp => "image/webp",
        }
    }

    /// File extension used when staging an upload of this type.
    pub fn extension(self) -> &'static str {
        match self {
            MediaType::Jpeg => "jpg",
            MediaType::Png => "png",
            MediaType::Webp => "webp",
        }
    }
}
