//! Server configuration read from the environment.
//!
//! - `MEDAYU_DB_PATH`: SQLite database file path (default: "medayu.db")
//! - `MEDAYU_PORT`: Server listen port (default: "3000")
//! - `MEDAYU_IMAGE_ROOT`: Root of the per-family image directories
//!   (default: "public/images")
//! - `MEDAYU_MAX_UPLOAD_MB`: Request body limit for uploads (default: 10)

use std::path::PathBuf;

use medayu_core::ProfileKind;

/// Per-family image directory names under the image root.
pub const CAROUSEL_DIR: &str = "halaman-utama";
pub const ANNOUNCEMENTS_DIR: &str = "pengumuman";

/// Directory name holding the photos of one profile kind.
pub fn profile_dir(kind: ProfileKind) -> &'static str {
    match kind {
        ProfileKind::Supervisor => "pengawas",
        ProfileKind::Advisor => "pembina",
        ProfileKind::Partner => "sahabat-medayu",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: String,
    pub port: u16,
    pub image_root: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            db_path: "medayu.db".to_string(),
            port: 3000,
            image_root: PathBuf::from("public/images"),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from `MEDAYU_*` environment variables.
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = ServerConfig::default();
        let port = match lookup("MEDAYU_PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "ignoring invalid MEDAYU_PORT");
                defaults.port
            }),
            None => defaults.port,
        };
        let max_upload_bytes = match lookup("MEDAYU_MAX_UPLOAD_MB") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|mb| mb.checked_mul(1024 * 1024))
                .unwrap_or_else(|| {
                    tracing::warn!(value = %raw, "ignoring invalid MEDAYU_MAX_UPLOAD_MB");
                    defaults.max_upload_bytes
                }),
            None => defaults.max_upload_bytes,
        };

        ServerConfig {
            db_path: lookup("MEDAYU_DB_PATH").unwrap_or(defaults.db_path),
            port,
            image_root: lookup("MEDAYU_IMAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.image_root),
            max_upload_bytes,
        }
    }

    /// Configuration for an in-memory database with images under `image_root`.
    pub fn for_image_root(image_root: impl Into<PathBuf>) -> Self {
        ServerConfig {
            db_path: ":memory:".to_string(),
            image_root: image_root.into(),
            ..ServerConfig::default()
        }
    }
}
