//! Application state shared by all handlers.
//!
//! [`AppState`] wraps the [`ContentService`] in `Arc<tokio::sync::Mutex<>>`.
//! `SqliteStore` holds a `rusqlite::Connection`, which is `!Sync`, so reads
//! and writes alike go through the one async mutex. This also serializes the
//! read-check-write sequences of the carousel; the store's own checks and
//! constraints remain the backstop.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::error::ContentError;
use crate::service::ContentService;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<tokio::sync::Mutex<ContentService>>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Opens the database and image directories named by `config`.
    pub fn new(config: ServerConfig) -> Result<Self, ContentError> {
        let service = ContentService::new(&config.db_path, &config.image_root)?;
        Ok(Self::from_parts(service, config))
    }

    /// In-memory database with images under `image_root` (for testing).
    pub fn in_memory(image_root: impl Into<std::path::PathBuf>) -> Result<Self, ContentError> {
        let config = ServerConfig::for_image_root(image_root);
        let service = ContentService::in_memory(&config.image_root)?;
        Ok(Self::from_parts(service, config))
    }

    fn from_parts(service: ContentService, config: ServerConfig) -> Self {
        AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
            sessions: Arc::new(SessionStore::new()),
            config: Arc::new(config),
        }
    }
}
