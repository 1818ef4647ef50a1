//! File store gateway for uploaded images.
//!
//! Each content family owns one [`ImageDir`]. An upload is first staged under
//! a collision-free name (`<millis>-<uuid>.<ext>`), validated by the service,
//! then converted to WebP. Only bare file names are ever stored in records;
//! anything else handed back to the gateway is refused.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Bytes;
use image::ImageFormat;
use uuid::Uuid;

use medayu_core::{MediaType, ProfileKind};

use crate::config::{profile_dir, ANNOUNCEMENTS_DIR, CAROUSEL_DIR};
use crate::error::ContentError;
use crate::undo::Rollback;

/// A file part received from a multipart form.
#[derive(Clone)]
pub struct Upload {
    /// File name as sent by the browser.
    pub original_name: String,
    /// Client-declared `Content-Type`.
    pub content_type: String,
    pub bytes: Bytes,
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("original_name", &self.original_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// An upload written to disk but not yet accepted.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub name: String,
    pub path: PathBuf,
    pub declared_type: String,
}

impl StagedFile {
    /// Classifies the client-declared media type.
    pub fn media_type(&self) -> Result<MediaType, ContentError> {
        Ok(MediaType::from_declared(&self.declared_type)?)
    }
}

/// One family's image directory.
#[derive(Debug, Clone)]
pub struct ImageDir {
    dir: PathBuf,
    url_prefix: String,
}

impl ImageDir {
    /// Opens `root/name`, creating it if needed.
    pub fn open(root: &Path, name: &str) -> Result<Self, ContentError> {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir)?;
        Ok(ImageDir {
            dir,
            url_prefix: format!("/images/{}", name),
        })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Public URL of a stored file.
    pub fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.url_prefix, name)
    }

    /// True if `name` is a bare file name present in this directory.
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Writes an upload under a fresh unique name.
    ///
    /// The file is registered on `rollback` before anything else can fail.
    pub fn stage(&self, upload: &Upload, rollback: &mut Rollback) -> Result<StagedFile, ContentError> {
        let name = format!(
            "{}-{}.{}",
            unix_millis(),
            Uuid::new_v4().simple(),
            staging_extension(upload)
        );
        let path = self.dir.join(&name);
        rollback.created_file(&path);
        std::fs::write(&path, &upload.bytes)?;
        tracing::debug!(file = %name, bytes = upload.bytes.len(), "staged upload");
        Ok(StagedFile {
            name,
            path,
            declared_type: upload.content_type.clone(),
        })
    }

    /// Re-encodes a staged upload as WebP and removes the staged original.
    ///
    /// Returns the bare name of the converted file. On failure nothing new
    /// is left behind except what `rollback` already tracks.
    pub fn convert(&self, staged: &StagedFile, rollback: &mut Rollback) -> Result<String, ContentError> {
        let bytes = std::fs::read(&staged.path)?;
        let decoded = image::load_from_memory(&bytes).map_err(|e| {
            ContentError::FileSystem(format!("cannot decode {}: {}", staged.name, e))
        })?;

        let stem = Path::new(&staged.name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| staged.name.clone());
        let name = format!("{}.webp", stem);
        let target = self.dir.join(&name);
        let replaces_staged = target != staged.path;
        if replaces_staged {
            rollback.created_file(&target);
        }

        image::DynamicImage::ImageRgba8(decoded.to_rgba8())
            .save_with_format(&target, ImageFormat::WebP)
            .map_err(|e| ContentError::FileSystem(format!("cannot encode {}: {}", name, e)))?;

        if replaces_staged {
            std::fs::remove_file(&staged.path)?;
        }
        tracing::debug!(from = %staged.name, to = %name, "converted upload to webp");
        Ok(name)
    }

    /// Removes a stored file, logging instead of failing.
    ///
    /// Used once the owning record no longer references the file.
    pub fn remove_best_effort(&self, name: &str) {
        let Some(path) = self.resolve(name) else {
            tracing::warn!(file = %name, dir = %self.dir.display(), "refusing to remove non-bare file name");
            return;
        };
        match std::fs::remove_file(&path) {
            Ok(()) => tracing::debug!(file = %name, "removed image"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(file = %name, "image already gone")
            }
            Err(err) => tracing::warn!(file = %name, error = %err, "could not remove image"),
        }
    }

    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let bare = Path::new(name).file_name()?;
        if name.is_empty() || bare != name || name == "." || name == ".." {
            return None;
        }
        Some(self.dir.join(bare))
    }
}

/// The image directories of every content family.
#[derive(Debug, Clone)]
pub struct ImageDirs {
    pub carousel: ImageDir,
    pub supervisors: ImageDir,
    pub advisors: ImageDir,
    pub partners: ImageDir,
    pub announcements: ImageDir,
}

impl ImageDirs {
    /// Opens (and creates) all family directories under `root`.
    pub fn open(root: &Path) -> Result<Self, ContentError> {
        Ok(ImageDirs {
            carousel: ImageDir::open(root, CAROUSEL_DIR)?,
            supervisors: ImageDir::open(root, profile_dir(ProfileKind::Supervisor))?,
            advisors: ImageDir::open(root, profile_dir(ProfileKind::Advisor))?,
            partners: ImageDir::open(root, profile_dir(ProfileKind::Partner))?,
            announcements: ImageDir::open(root, ANNOUNCEMENTS_DIR)?,
        })
    }

    pub fn profile(&self, kind: ProfileKind) -> &ImageDir {
        match kind {
            ProfileKind::Supervisor => &self.supervisors,
            ProfileKind::Advisor => &self.advisors,
            ProfileKind::Partner => &self.partners,
        }
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Extension for the staged file: the declared type's if it is accepted,
/// else a sanitized copy of the browser's, else `upload`.
fn staging_extension(upload: &Upload) -> String {
    if let Ok(media) = MediaType::from_declared(&upload.content_type) {
        return media.extension().to_string();
    }
    Path::new(&upload.original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| "upload".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes() -> Bytes {
        let img = image::RgbImage::from_pixel(4, 3, image::Rgb([200, 30, 30]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        Bytes::from(out.into_inner())
    }

    fn upload(name: &str, content_type: &str, bytes: Bytes) -> Upload {
        Upload {
            original_name: name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        }
    }

    fn files_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn stage_uses_unique_names_with_declared_extension() {
        let root = tempfile::tempdir().unwrap();
        let dir = ImageDir::open(root.path(), CAROUSEL_DIR).unwrap();
        let mut rollback = Rollback::new();
        let a = dir.stage(&upload("A.PNG", "image/png", png_bytes()), &mut rollback).unwrap();
        let b = dir.stage(&upload("A.PNG", "image/png", png_bytes()), &mut rollback).unwrap();
        assert_ne!(a.name, b.name);
        assert!(a.name.ends_with(".png"));
        assert!(dir.contains(&a.name));
        rollback.commit();
        assert_eq!(files_in(dir.path()).len(), 2);
    }

    #[test]
    fn unaccepted_type_keeps_sanitized_extension() {
        let u = upload("clip.GIF", "image/gif", Bytes::from_static(b"GIF89a"));
        assert_eq!(staging_extension(&u), "gif");
        let u = upload("../../etc/passwd", "text/plain", Bytes::new());
        assert_eq!(staging_extension(&u), "upload");
    }

    #[test]
    fn convert_replaces_staged_file_with_webp() {
        let root = tempfile::tempdir().unwrap();
        let dir = ImageDir::open(root.path(), CAROUSEL_DIR).unwrap();
        let mut rollback = Rollback::new();
        let staged = dir.stage(&upload("a.png", "image/png", png_bytes()), &mut rollback).unwrap();
        let name = dir.convert(&staged, &mut rollback).unwrap();
        rollback.commit();

        assert!(name.ends_with(".webp"));
        assert_eq!(files_in(dir.path()), vec![name.clone()]);
        let bytes = std::fs::read(dir.path().join(&name)).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::WebP);
    }

    #[test]
    fn failed_conversion_leaves_nothing_after_rollback() {
        let root = tempfile::tempdir().unwrap();
        let dir = ImageDir::open(root.path(), CAROUSEL_DIR).unwrap();
        let mut rollback = Rollback::new();
        let staged = dir
            .stage(&upload("a.png", "image/png", Bytes::from_static(b"not an image")), &mut rollback)
            .unwrap();
        let err = dir.convert(&staged, &mut rollback).unwrap_err();
        assert!(err.is_internal());
        drop(rollback);
        assert!(files_in(dir.path()).is_empty());
    }

    #[test]
    fn remove_refuses_paths_outside_the_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = ImageDir::open(root.path(), CAROUSEL_DIR).unwrap();
        let outside = root.path().join("keep.webp");
        std::fs::write(&outside, b"x").unwrap();

        dir.remove_best_effort("../keep.webp");
        assert!(outside.exists());
        assert!(!dir.contains("../keep.webp"));

        // Missing files are not an error.
        dir.remove_best_effort("never-existed.webp");
    }

    #[test]
    fn dirs_are_created_per_family() {
        let root = tempfile::tempdir().unwrap();
        let dirs = ImageDirs::open(root.path()).unwrap();
        assert!(dirs.carousel.path().ends_with("halaman-utama"));
        assert!(dirs.profile(ProfileKind::Partner).path().ends_with("sahabat-medayu"));
        assert_eq!(
            dirs.announcements.url_for("x.webp"),
            "/images/pengumuman/x.webp"
        );
        assert!(root.path().join("pembina").is_dir());
    }
}
