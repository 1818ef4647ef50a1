//! HTTP backend for managing the Medayu site content.
//!
//! Serves the manager pages for the homepage carousel, the supervisor,
//! advisor and partner listings, and announcements. Uploaded images are
//! staged, validated, converted to WebP and tracked so that a rejected
//! request never leaves files behind.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod service;
pub mod session;
pub mod state;
pub mod undo;
pub mod uploads;
