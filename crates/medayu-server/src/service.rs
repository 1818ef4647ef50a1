//! Lifecycle service for all site content.
//!
//! [`ContentService`] owns the store and the image directories. Every
//! mutating operation follows the same shape: stage the upload (tracked by a
//! [`Rollback`]), validate in a fixed order, convert, persist, commit, and
//! only then remove any file the record no longer references. Returning
//! early with an error drops the rollback, which removes the staged and
//! converted files of the rejected request.

use std::path::Path;

use medayu_core::model::{AnnouncementFields, ProfileFields, SlideFields};
use medayu_core::{
    password, Announcement, AnnouncementId, CarouselSlide, DashboardCounts, Manager, ManagerId,
    Ordinal, Profile, ProfileId, ProfileKind, SlideId, SlotMap, MAX_SLIDES,
};
use medayu_storage::{ContentStore, SqliteStore};

use crate::error::ContentError;
use crate::schema::account::{LoginForm, PasswordForm};
use crate::schema::announcements::{
    AnnouncementForm, AnnouncementFormData, AnnouncementListData, AnnouncementView,
};
use crate::schema::carousel::{SlideForm, SlideFormData, SlideListData, SlideView};
use crate::schema::profiles::{ProfileForm, ProfileFormData, ProfileListData, ProfileView};
use crate::undo::Rollback;
use crate::uploads::{ImageDir, ImageDirs, StagedFile, Upload};

pub struct ContentService<S: ContentStore = SqliteStore> {
    store: S,
    images: ImageDirs,
}

impl ContentService<SqliteStore> {
    /// Opens the SQLite database at `db_path` with images under `image_root`.
    pub fn new(db_path: &str, image_root: &Path) -> Result<Self, ContentError> {
        let store = SqliteStore::new(db_path)?;
        Ok(Self::with_store(store, ImageDirs::open(image_root)?))
    }

    /// In-memory database with images under `image_root` (for testing).
    pub fn in_memory(image_root: &Path) -> Result<Self, ContentError> {
        let store = SqliteStore::in_memory()?;
        Ok(Self::with_store(store, ImageDirs::open(image_root)?))
    }
}

impl<S: ContentStore> ContentService<S> {
    pub fn with_store(store: S, images: ImageDirs) -> Self {
        ContentService { store, images }
    }

    pub fn images(&self) -> &ImageDirs {
        &self.images
    }

    // -------------------------------------------------------------------
    // Carousel
    // -------------------------------------------------------------------

    /// A fresh snapshot of the used ordinals.
    pub fn slot_map(&self) -> Result<SlotMap, ContentError> {
        Ok(SlotMap::from_used(self.store.used_ordinals()?))
    }

    /// Free ordinals, ascending. `keep` is reported free even if used.
    pub fn available_ordinals(&self, keep: Option<Ordinal>) -> Result<Vec<Ordinal>, ContentError> {
        Ok(self.slot_map()?.available(keep))
    }

    pub fn list_slides(&self) -> Result<SlideListData, ContentError> {
        let slides: Vec<_> = self
            .store
            .list_slides()?
            .into_iter()
            .map(|s| SlideView::new(s, &self.images.carousel))
            .collect();
        Ok(SlideListData {
            is_full: slides.len() >= MAX_SLIDES as usize,
            capacity: MAX_SLIDES,
            slides,
        })
    }

    pub fn get_slide(&self, id: SlideId) -> Result<CarouselSlide, ContentError> {
        self.store
            .get_slide(id)?
            .ok_or_else(|| ContentError::NotFound(format!("slide {}", id)))
    }

    /// Data for the create form; refused once the carousel is full.
    pub fn slide_create_form(&self) -> Result<SlideFormData, ContentError> {
        let slots = self.slot_map()?;
        if slots.is_full() {
            return Err(ContentError::CapacityExceeded);
        }
        Ok(SlideFormData {
            slide: None,
            available_ordinals: slots.available(None),
        })
    }

    pub fn slide_edit_form(&self, id: SlideId) -> Result<SlideFormData, ContentError> {
        let slide = self.get_slide(id)?;
        Ok(SlideFormData {
            available_ordinals: self.available_ordinals(Some(slide.ordinal))?,
            slide: Some(SlideView::new(slide, &self.images.carousel)),
        })
    }

    /// Creates a slide.
    ///
    /// Checks, in order: capacity, image present, ordinal numeric and in
    /// range, media type, ordinal free.
    pub fn create_slide(&mut self, form: SlideForm) -> Result<CarouselSlide, ContentError> {
        let dir = &self.images.carousel;
        let mut rollback = Rollback::new();
        let staged = stage_optional(dir, form.image.as_ref(), &mut rollback)?;

        if self.store.count_slides()? >= MAX_SLIDES as u64 {
            return Err(ContentError::CapacityExceeded);
        }
        let staged = staged.ok_or(ContentError::MissingField("image"))?;
        let ordinal = Ordinal::parse(&form.ordinal)?;
        staged.media_type()?;
        if !SlotMap::from_used(self.store.used_ordinals()?).is_free(ordinal, None) {
            return Err(ContentError::OrdinalConflict(ordinal));
        }

        let image_file_name = dir.convert(&staged, &mut rollback)?;
        let fields = SlideFields {
            image_file_name,
            ordinal,
        };
        let id = self.store.insert_slide(&fields)?;
        rollback.commit();

        tracing::info!(slide = %id, ordinal = %ordinal, file = %fields.image_file_name, "carousel slide created");
        Ok(CarouselSlide {
            id,
            image_file_name: fields.image_file_name,
            ordinal,
        })
    }

    /// Updates a slide's ordinal and, if a new image was sent, its image.
    ///
    /// The previous image is removed only after the record points at the
    /// converted replacement.
    pub fn update_slide(&mut self, id: SlideId, form: SlideForm) -> Result<CarouselSlide, ContentError> {
        let dir = &self.images.carousel;
        let mut rollback = Rollback::new();
        let staged = stage_optional(dir, form.image.as_ref(), &mut rollback)?;
        let existing = self
            .store
            .get_slide(id)?
            .ok_or_else(|| ContentError::NotFound(format!("slide {}", id)))?;

        let ordinal = Ordinal::parse(&form.ordinal)?;
        let effective_name = staged
            .as_ref()
            .map(|s| s.name.as_str())
            .unwrap_or(existing.image_file_name.as_str());
        if effective_name.is_empty() {
            return Err(ContentError::MissingField("image"));
        }
        if ordinal != existing.ordinal
            && !SlotMap::from_used(self.store.used_ordinals()?).is_free(ordinal, Some(existing.ordinal))
        {
            return Err(ContentError::OrdinalConflict(ordinal));
        }
        if let Some(staged) = &staged {
            staged.media_type()?;
        }

        let image_file_name = match &staged {
            Some(staged) => dir.convert(staged, &mut rollback)?,
            None => existing.image_file_name.clone(),
        };
        let fields = SlideFields {
            image_file_name,
            ordinal,
        };
        self.store.update_slide(id, &fields)?;
        rollback.commit();

        if staged.is_some() && existing.image_file_name != fields.image_file_name {
            dir.remove_best_effort(&existing.image_file_name);
        }
        tracing::info!(slide = %id, ordinal = %ordinal, file = %fields.image_file_name, "carousel slide updated");
        Ok(CarouselSlide {
            id,
            image_file_name: fields.image_file_name,
            ordinal,
        })
    }

    /// Deletes a slide, then its image.
    pub fn delete_slide(&mut self, id: SlideId) -> Result<CarouselSlide, ContentError> {
        let existing = self.get_slide(id)?;
        if !self.store.delete_slide(id)? {
            return Err(ContentError::NotFound(format!("slide {}", id)));
        }
        if !existing.image_file_name.is_empty() {
            self.images.carousel.remove_best_effort(&existing.image_file_name);
        }
        tracing::info!(slide = %id, ordinal = %existing.ordinal, "carousel slide deleted");
        Ok(existing)
    }

    // -------------------------------------------------------------------
    // Profiles
    // -------------------------------------------------------------------

    pub fn list_profiles(&self, kind: ProfileKind) -> Result<ProfileListData, ContentError> {
        let dir = self.images.profile(kind);
        Ok(ProfileListData {
            kind,
            profiles: self
                .store
                .list_profiles(kind)?
                .into_iter()
                .map(|p| ProfileView::new(p, dir))
                .collect(),
        })
    }

    pub fn get_profile(&self, kind: ProfileKind, id: ProfileId) -> Result<Profile, ContentError> {
        self.store
            .get_profile(kind, id)?
            .ok_or_else(|| ContentError::NotFound(format!("{} {}", kind.label(), id)))
    }

    pub fn profile_edit_form(&self, kind: ProfileKind, id: ProfileId) -> Result<ProfileFormData, ContentError> {
        let profile = self.get_profile(kind, id)?;
        Ok(ProfileFormData {
            kind,
            profile: Some(ProfileView::new(profile, self.images.profile(kind))),
        })
    }

    pub fn create_profile(&mut self, kind: ProfileKind, form: ProfileForm) -> Result<Profile, ContentError> {
        let dir = self.images.profile(kind);
        let mut rollback = Rollback::new();
        let staged = stage_optional(dir, form.photo.as_ref(), &mut rollback)?;

        let name = required(&form.name, "name")?;
        let staged = staged.ok_or(ContentError::MissingField("photo"))?;
        staged.media_type()?;

        let fields = ProfileFields {
            name,
            photo: dir.convert(&staged, &mut rollback)?,
        };
        let id = self.store.insert_profile(kind, &fields)?;
        rollback.commit();

        tracing::info!(kind = %kind, id = %id, "profile created");
        Ok(Profile {
            id,
            kind,
            name: fields.name,
            photo: fields.photo,
        })
    }

    pub fn update_profile(
        &mut self,
        kind: ProfileKind,
        id: ProfileId,
        form: ProfileForm,
    ) -> Result<Profile, ContentError> {
        let dir = self.images.profile(kind);
        let mut rollback = Rollback::new();
        let staged = stage_optional(dir, form.photo.as_ref(), &mut rollback)?;
        let existing = self
            .store
            .get_profile(kind, id)?
            .ok_or_else(|| ContentError::NotFound(format!("{} {}", kind.label(), id)))?;

        let name = required(&form.name, "name")?;
        if staged.is_none() && existing.photo.is_empty() {
            return Err(ContentError::MissingField("photo"));
        }
        if let Some(staged) = &staged {
            staged.media_type()?;
        }

        let photo = match &staged {
            Some(staged) => dir.convert(staged, &mut rollback)?,
            None => existing.photo.clone(),
        };
        let fields = ProfileFields { name, photo };
        self.store.update_profile(kind, id, &fields)?;
        rollback.commit();

        if staged.is_some() && existing.photo != fields.photo {
            dir.remove_best_effort(&existing.photo);
        }
        tracing::info!(kind = %kind, id = %id, "profile updated");
        Ok(Profile {
            id,
            kind,
            name: fields.name,
            photo: fields.photo,
        })
    }

    pub fn delete_profile(&mut self, kind: ProfileKind, id: ProfileId) -> Result<Profile, ContentError> {
        let existing = self.get_profile(kind, id)?;
        if !self.store.delete_profile(kind, id)? {
            return Err(ContentError::NotFound(format!("{} {}", kind.label(), id)));
        }
        if !existing.photo.is_empty() {
            self.images.profile(kind).remove_best_effort(&existing.photo);
        }
        tracing::info!(kind = %kind, id = %id, "profile deleted");
        Ok(existing)
    }

    // -------------------------------------------------------------------
    // Announcements
    // -------------------------------------------------------------------

    pub fn list_announcements(&self) -> Result<AnnouncementListData, ContentError> {
        Ok(AnnouncementListData {
            announcements: self
                .store
                .list_announcements()?
                .into_iter()
                .map(|a| AnnouncementView::new(a, &self.images.announcements))
                .collect(),
        })
    }

    pub fn get_announcement(&self, id: AnnouncementId) -> Result<Announcement, ContentError> {
        self.store
            .get_announcement(id)?
            .ok_or_else(|| ContentError::NotFound(format!("announcement {}", id)))
    }

    pub fn announcement_edit_form(&self, id: AnnouncementId) -> Result<AnnouncementFormData, ContentError> {
        let announcement = self.get_announcement(id)?;
        Ok(AnnouncementFormData {
            announcement: Some(AnnouncementView::new(announcement, &self.images.announcements)),
        })
    }

    pub fn create_announcement(&mut self, form: AnnouncementForm) -> Result<Announcement, ContentError> {
        let dir = &self.images.announcements;
        let mut rollback = Rollback::new();
        let staged = stage_optional(dir, form.photo.as_ref(), &mut rollback)?;

        let title = required(&form.title, "title")?;
        let body = required(&form.body, "body")?;
        if let Some(staged) = &staged {
            staged.media_type()?;
        }

        let photo = match &staged {
            Some(staged) => Some(dir.convert(staged, &mut rollback)?),
            None => None,
        };
        let fields = AnnouncementFields { title, body, photo };
        let id = self.store.insert_announcement(&fields)?;
        rollback.commit();

        tracing::info!(announcement = %id, "announcement created");
        Ok(Announcement {
            id,
            title: fields.title,
            body: fields.body,
            photo: fields.photo,
        })
    }

    /// Updates an announcement; without a new photo the old one is kept.
    pub fn update_announcement(
        &mut self,
        id: AnnouncementId,
        form: AnnouncementForm,
    ) -> Result<Announcement, ContentError> {
        let dir = &self.images.announcements;
        let mut rollback = Rollback::new();
        let staged = stage_optional(dir, form.photo.as_ref(), &mut rollback)?;
        let existing = self
            .store
            .get_announcement(id)?
            .ok_or_else(|| ContentError::NotFound(format!("announcement {}", id)))?;

        let title = required(&form.title, "title")?;
        let body = required(&form.body, "body")?;
        if let Some(staged) = &staged {
            staged.media_type()?;
        }

        let photo = match &staged {
            Some(staged) => Some(dir.convert(staged, &mut rollback)?),
            None => existing.photo.clone(),
        };
        let fields = AnnouncementFields { title, body, photo };
        self.store.update_announcement(id, &fields)?;
        rollback.commit();

        if staged.is_some() {
            if let Some(old) = existing.photo.as_deref().filter(|old| !old.is_empty()) {
                if fields.photo.as_deref() != Some(old) {
                    dir.remove_best_effort(old);
                }
            }
        }
        tracing::info!(announcement = %id, "announcement updated");
        Ok(Announcement {
            id,
            title: fields.title,
            body: fields.body,
            photo: fields.photo,
        })
    }

    pub fn delete_announcement(&mut self, id: AnnouncementId) -> Result<Announcement, ContentError> {
        let existing = self.get_announcement(id)?;
        if !self.store.delete_announcement(id)? {
            return Err(ContentError::NotFound(format!("announcement {}", id)));
        }
        if let Some(photo) = existing.photo.as_deref().filter(|p| !p.is_empty()) {
            self.images.announcements.remove_best_effort(photo);
        }
        tracing::info!(announcement = %id, "announcement deleted");
        Ok(existing)
    }

    // -------------------------------------------------------------------
    // Accounts
    // -------------------------------------------------------------------

    pub fn manager(&self, id: ManagerId) -> Result<Manager, ContentError> {
        self.store
            .get_manager(id)?
            .ok_or_else(|| ContentError::NotFound(format!("manager {}", id)))
    }

    /// Registers a manager account after checking the password policy.
    pub fn register_manager(
        &mut self,
        name: &str,
        email: &str,
        plain_password: &str,
    ) -> Result<ManagerId, ContentError> {
        let name = required(name, "name")?;
        let email = required(email, "email")?;
        password::check_policy(plain_password)?;
        let hash = password::hash(plain_password)?;
        let id = self.store.insert_manager(&name, &email, &hash)?;
        tracing::info!(manager = %id, "manager registered");
        Ok(id)
    }

    /// Checks login credentials.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub fn authenticate(&self, form: &LoginForm) -> Result<Manager, ContentError> {
        let email = required(&form.email, "email")?;
        if form.password.is_empty() {
            return Err(ContentError::MissingField("password"));
        }
        let manager = self
            .store
            .find_manager_by_email(&email)?
            .ok_or(ContentError::InvalidCredentials)?;
        if !password::verify(&form.password, &manager.password_hash)? {
            return Err(ContentError::InvalidCredentials);
        }
        Ok(manager)
    }

    pub fn change_password(&mut self, id: ManagerId, form: &PasswordForm) -> Result<(), ContentError> {
        if form.current_password.is_empty() {
            return Err(ContentError::MissingField("current_password"));
        }
        if form.new_password.is_empty() {
            return Err(ContentError::MissingField("new_password"));
        }
        if form.confirm_password.is_empty() {
            return Err(ContentError::MissingField("confirm_password"));
        }

        let manager = self.manager(id)?;
        if !password::verify(&form.current_password, &manager.password_hash)? {
            return Err(ContentError::WrongPassword);
        }
        password::check_policy(&form.new_password)?;
        if form.new_password != form.confirm_password {
            return Err(ContentError::PasswordMismatch);
        }

        let hash = password::hash(&form.new_password)?;
        self.store.update_manager_password(id, &hash)?;
        tracing::info!(manager = %id, "password changed");
        Ok(())
    }

    pub fn dashboard(&self) -> Result<DashboardCounts, ContentError> {
        Ok(self.store.dashboard_counts()?)
    }
}

fn stage_optional(
    dir: &ImageDir,
    upload: Option<&Upload>,
    rollback: &mut Rollback,
) -> Result<Option<StagedFile>, ContentError> {
    upload.map(|u| dir.stage(u, rollback)).transpose()
}

fn required(value: &str, field: &'static str) -> Result<String, ContentError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ContentError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use axum::body::Bytes;
    use image::ImageFormat;
    use medayu_storage::InMemoryStore;
    use tempfile::TempDir;

    fn service() -> (ContentService<InMemoryStore>, TempDir) {
        let root = tempfile::tempdir().unwrap();
        let images = ImageDirs::open(root.path()).unwrap();
        (ContentService::with_store(InMemoryStore::new(), images), root)
    }

    fn encoded(format: ImageFormat) -> Bytes {
        let img = image::RgbImage::from_pixel(6, 4, image::Rgb([10, 120, 200]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, format)
            .unwrap();
        Bytes::from(out.into_inner())
    }

    fn png() -> Upload {
        Upload {
            original_name: "A.png".into(),
            content_type: "image/png".into(),
            bytes: encoded(ImageFormat::Png),
        }
    }

    fn jpg() -> Upload {
        Upload {
            original_name: "A.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: encoded(ImageFormat::Jpeg),
        }
    }

    fn corrupt_png() -> Upload {
        Upload {
            original_name: "broken.png".into(),
            content_type: "image/png".into(),
            bytes: Bytes::from_static(b"\x89PNG but not really"),
        }
    }

    fn slide(ordinal: &str, image: Option<Upload>) -> SlideForm {
        SlideForm {
            ordinal: ordinal.to_string(),
            image,
        }
    }

    fn files(dir: &ImageDir) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn ordinals(values: &[Ordinal]) -> Vec<u8> {
        values.iter().map(|o| o.get()).collect()
    }

    // -- carousel: create ----------------------------------------------------

    #[test]
    fn create_on_empty_converts_and_takes_the_ordinal() {
        let (mut svc, _root) = service();
        let created = svc.create_slide(slide("4", Some(png()))).unwrap();

        assert_eq!(created.ordinal.get(), 4);
        assert!(created.image_file_name.ends_with(".webp"));
        assert_eq!(files(&svc.images().carousel), vec![created.image_file_name.clone()]);
        assert_eq!(
            ordinals(&svc.available_ordinals(None).unwrap()),
            vec![1, 2, 3, 5, 6, 7, 8]
        );
    }

    #[test]
    fn non_numeric_ordinal_rejects_and_removes_upload() {
        let (mut svc, _root) = service();
        let err = svc.create_slide(slide("abc", Some(jpg()))).unwrap_err();
        assert!(matches!(err, ContentError::MissingField("ordinal")));
        assert!(files(&svc.images().carousel).is_empty());
        assert!(svc.list_slides().unwrap().slides.is_empty());
    }

    #[test]
    fn missing_image_is_reported_before_ordinal() {
        let (mut svc, _root) = service();
        let err = svc.create_slide(slide("abc", None)).unwrap_err();
        assert!(matches!(err, ContentError::MissingField("image")));
    }

    #[test]
    fn out_of_range_ordinal_is_rejected() {
        let (mut svc, _root) = service();
        let err = svc.create_slide(slide("9", Some(png()))).unwrap_err();
        assert!(matches!(err, ContentError::OrdinalOutOfRange(9)));
        assert!(files(&svc.images().carousel).is_empty());
    }

    #[test]
    fn unsupported_media_type_removes_upload() {
        let (mut svc, _root) = service();
        let gif = Upload {
            original_name: "anim.gif".into(),
            content_type: "image/gif".into(),
            bytes: Bytes::from_static(b"GIF89a"),
        };
        let err = svc.create_slide(slide("1", Some(gif))).unwrap_err();
        assert!(matches!(err, ContentError::UnsupportedMediaType(_)));
        assert!(files(&svc.images().carousel).is_empty());
    }

    #[test]
    fn used_ordinal_conflicts_and_removes_upload() {
        let (mut svc, _root) = service();
        let first = svc.create_slide(slide("3", Some(png()))).unwrap();
        let err = svc.create_slide(slide("3", Some(jpg()))).unwrap_err();
        assert!(matches!(err, ContentError::OrdinalConflict(o) if o.get() == 3));
        assert_eq!(files(&svc.images().carousel), vec![first.image_file_name]);
    }

    #[test]
    fn ninth_create_is_refused_leaving_disk_and_store_unchanged() {
        let (mut svc, _root) = service();
        for o in 1..=8 {
            svc.create_slide(slide(&o.to_string(), Some(png()))).unwrap();
        }
        let before = files(&svc.images().carousel);
        assert_eq!(before.len(), 8);

        let err = svc.create_slide(slide("1", Some(png()))).unwrap_err();
        assert!(matches!(err, ContentError::CapacityExceeded));
        assert_eq!(files(&svc.images().carousel), before);
        assert_eq!(svc.list_slides().unwrap().slides.len(), 8);
        assert!(svc.list_slides().unwrap().is_full);
        assert!(matches!(
            svc.slide_create_form(),
            Err(ContentError::CapacityExceeded)
        ));
    }

    #[test]
    fn no_two_slides_share_an_ordinal() {
        let (mut svc, _root) = service();
        for raw in ["2", "5", "2", "8", "5", "1", "8", "3"] {
            let _ = svc.create_slide(slide(raw, Some(png())));
        }
        let listed = svc.list_slides().unwrap().slides;
        let mut seen: Vec<u8> = listed.iter().map(|s| s.ordinal.get()).collect();
        assert_eq!(seen, vec![1, 2, 3, 5, 8]);
        seen.dedup();
        assert_eq!(seen.len(), listed.len());
        assert_eq!(files(&svc.images().carousel).len(), listed.len());
    }

    #[test]
    fn available_ordinals_after_two_and_five() {
        let (mut svc, _root) = service();
        assert_eq!(
            ordinals(&svc.available_ordinals(None).unwrap()),
            vec![1, 2, 3, 4, 5, 6, 7, 8]
        );
        svc.create_slide(slide("2", Some(png()))).unwrap();
        svc.create_slide(slide("5", Some(png()))).unwrap();
        assert_eq!(
            ordinals(&svc.available_ordinals(None).unwrap()),
            vec![1, 3, 4, 6, 7, 8]
        );
    }

    // -- carousel: update ----------------------------------------------------

    #[test]
    fn update_to_own_ordinal_keeps_the_file() {
        let (mut svc, _root) = service();
        let created = svc.create_slide(slide("6", Some(png()))).unwrap();
        let updated = svc.update_slide(created.id, slide("6", None)).unwrap();
        assert_eq!(updated, created);
        assert_eq!(files(&svc.images().carousel), vec![created.image_file_name]);
    }

    #[test]
    fn edit_form_offers_own_ordinal() {
        let (mut svc, _root) = service();
        let a = svc.create_slide(slide("2", Some(png()))).unwrap();
        svc.create_slide(slide("5", Some(png()))).unwrap();
        let form = svc.slide_edit_form(a.id).unwrap();
        assert_eq!(ordinals(&form.available_ordinals), vec![1, 2, 3, 4, 6, 7, 8]);
        assert_eq!(form.slide.unwrap().image_url, format!("/images/halaman-utama/{}", a.image_file_name));
    }

    #[test]
    fn update_with_new_image_removes_the_old_file_after_persisting() {
        let (mut svc, _root) = service();
        let created = svc.create_slide(slide("1", Some(png()))).unwrap();
        let updated = svc.update_slide(created.id, slide("7", Some(jpg()))).unwrap();

        assert_ne!(updated.image_file_name, created.image_file_name);
        assert_eq!(updated.ordinal.get(), 7);
        assert_eq!(files(&svc.images().carousel), vec![updated.image_file_name.clone()]);
        assert_eq!(svc.get_slide(created.id).unwrap(), updated);
    }

    #[test]
    fn failed_conversion_on_update_keeps_old_file_and_record() {
        let (mut svc, _root) = service();
        let created = svc.create_slide(slide("1", Some(png()))).unwrap();
        let err = svc
            .update_slide(created.id, slide("2", Some(corrupt_png())))
            .unwrap_err();

        assert!(err.is_internal());
        assert_eq!(files(&svc.images().carousel), vec![created.image_file_name.clone()]);
        assert_eq!(svc.get_slide(created.id).unwrap(), created);
    }

    #[test]
    fn update_into_another_slides_ordinal_conflicts() {
        let (mut svc, _root) = service();
        let a = svc.create_slide(slide("1", Some(png()))).unwrap();
        svc.create_slide(slide("2", Some(png()))).unwrap();
        let err = svc.update_slide(a.id, slide("2", Some(jpg()))).unwrap_err();
        assert!(matches!(err, ContentError::OrdinalConflict(_)));
        assert_eq!(files(&svc.images().carousel).len(), 2);
        assert_eq!(svc.get_slide(a.id).unwrap().ordinal.get(), 1);
    }

    #[test]
    fn update_of_missing_slide_removes_upload() {
        let (mut svc, _root) = service();
        let err = svc.update_slide(SlideId(42), slide("1", Some(png()))).unwrap_err();
        assert!(matches!(err, ContentError::NotFound(_)));
        assert!(files(&svc.images().carousel).is_empty());
    }

    #[test]
    fn update_with_bad_ordinal_removes_upload() {
        let (mut svc, _root) = service();
        let created = svc.create_slide(slide("3", Some(png()))).unwrap();
        let err = svc.update_slide(created.id, slide("abc", Some(jpg()))).unwrap_err();

        assert!(matches!(err, ContentError::MissingField("ordinal")));
        assert_eq!(files(&svc.images().carousel), vec![created.image_file_name.clone()]);
        assert_eq!(svc.get_slide(created.id).unwrap(), created);
    }

    #[test]
    fn update_with_unsupported_type_removes_upload() {
        let (mut svc, _root) = service();
        let created = svc.create_slide(slide("3", Some(png()))).unwrap();
        let gif = Upload {
            original_name: "anim.gif".into(),
            content_type: "image/gif".into(),
            bytes: Bytes::from_static(b"GIF89a"),
        };
        let err = svc.update_slide(created.id, slide("4", Some(gif))).unwrap_err();

        assert!(matches!(err, ContentError::UnsupportedMediaType(_)));
        assert_eq!(files(&svc.images().carousel), vec![created.image_file_name.clone()]);
        assert_eq!(svc.get_slide(created.id).unwrap(), created);
    }

    // -- carousel: delete ----------------------------------------------------

    #[test]
    fn delete_removes_record_and_file() {
        let (mut svc, _root) = service();
        let created = svc.create_slide(slide("3", Some(png()))).unwrap();
        svc.delete_slide(created.id).unwrap();

        assert!(files(&svc.images().carousel).is_empty());
        assert!(matches!(svc.get_slide(created.id), Err(ContentError::NotFound(_))));
        assert!(matches!(svc.delete_slide(created.id), Err(ContentError::NotFound(_))));
        assert_eq!(ordinals(&svc.available_ordinals(None).unwrap()).len(), 8);
    }

    #[test]
    fn delete_tolerates_an_already_missing_file() {
        let (mut svc, _root) = service();
        let created = svc.create_slide(slide("3", Some(png()))).unwrap();
        std::fs::remove_file(svc.images().carousel.path().join(&created.image_file_name)).unwrap();
        svc.delete_slide(created.id).unwrap();
        assert!(svc.list_slides().unwrap().slides.is_empty());
    }

    // -- profiles ------------------------------------------------------------

    #[test]
    fn profile_validation_order() {
        let (mut svc, _root) = service();
        let kind = ProfileKind::Supervisor;
        let err = svc
            .create_profile(kind, ProfileForm { name: " ".into(), photo: Some(png()) })
            .unwrap_err();
        assert!(matches!(err, ContentError::MissingField("name")));
        assert!(files(svc.images().profile(kind)).is_empty());

        let err = svc
            .create_profile(kind, ProfileForm { name: "Ibu Sari".into(), photo: None })
            .unwrap_err();
        assert!(matches!(err, ContentError::MissingField("photo")));
    }

    #[test]
    fn profile_update_keeps_or_replaces_photo() {
        let (mut svc, _root) = service();
        let kind = ProfileKind::Partner;
        let created = svc
            .create_profile(kind, ProfileForm { name: "Toko Buku".into(), photo: Some(png()) })
            .unwrap();

        let renamed = svc
            .update_profile(kind, created.id, ProfileForm { name: "Toko Buku Medayu".into(), photo: None })
            .unwrap();
        assert_eq!(renamed.photo, created.photo);

        let rephotographed = svc
            .update_profile(kind, created.id, ProfileForm { name: "Toko Buku Medayu".into(), photo: Some(jpg()) })
            .unwrap();
        assert_eq!(files(svc.images().profile(kind)), vec![rephotographed.photo.clone()]);

        // Kinds do not see each other's records or directories.
        assert!(svc.list_profiles(ProfileKind::Advisor).unwrap().profiles.is_empty());
        assert!(files(svc.images().profile(ProfileKind::Advisor)).is_empty());

        svc.delete_profile(kind, created.id).unwrap();
        assert!(files(svc.images().profile(kind)).is_empty());
    }

    // -- announcements -------------------------------------------------------

    #[test]
    fn announcement_photo_is_optional() {
        let (mut svc, _root) = service();
        let err = svc
            .create_announcement(AnnouncementForm { title: "Libur".into(), body: "".into(), photo: None })
            .unwrap_err();
        assert!(matches!(err, ContentError::MissingField("body")));

        let plain = svc
            .create_announcement(AnnouncementForm {
                title: "Libur".into(),
                body: "Perpustakaan tutup".into(),
                photo: None,
            })
            .unwrap();
        assert_eq!(plain.photo, None);

        let with_photo = svc
            .update_announcement(
                plain.id,
                AnnouncementForm {
                    title: "Libur".into(),
                    body: "Perpustakaan tutup hari Senin".into(),
                    photo: Some(png()),
                },
            )
            .unwrap();
        let photo = with_photo.photo.clone().unwrap();
        assert_eq!(files(&svc.images().announcements), vec![photo.clone()]);

        // An update without a photo keeps the current one.
        let kept = svc
            .update_announcement(
                plain.id,
                AnnouncementForm { title: "Libur".into(), body: "Tutup".into(), photo: None },
            )
            .unwrap();
        assert_eq!(kept.photo.as_deref(), Some(photo.as_str()));

        svc.delete_announcement(plain.id).unwrap();
        assert!(files(&svc.images().announcements).is_empty());
    }

    // -- accounts ------------------------------------------------------------

    fn login(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn authentication_does_not_reveal_which_part_failed() {
        let (mut svc, _root) = service();
        let id = svc.register_manager("Rina", "rina@medayu.org", "Rahasia1").unwrap();

        assert_eq!(svc.authenticate(&login(" rina@medayu.org ", "Rahasia1")).unwrap().id, id);
        assert!(matches!(
            svc.authenticate(&login("rina@medayu.org", "salah")),
            Err(ContentError::InvalidCredentials)
        ));
        assert!(matches!(
            svc.authenticate(&login("nobody@medayu.org", "Rahasia1")),
            Err(ContentError::InvalidCredentials)
        ));
        assert!(matches!(
            svc.authenticate(&login("", "Rahasia1")),
            Err(ContentError::MissingField("email"))
        ));
        assert!(matches!(
            svc.authenticate(&login("rina@medayu.org", "")),
            Err(ContentError::MissingField("password"))
        ));
    }

    #[test]
    fn password_change_rules() {
        let (mut svc, _root) = service();
        let id = svc.register_manager("Rina", "rina@medayu.org", "Rahasia1").unwrap();
        let change = |current: &str, new: &str, confirm: &str| PasswordForm {
            current_password: current.into(),
            new_password: new.into(),
            confirm_password: confirm.into(),
        };

        assert!(matches!(
            svc.change_password(id, &change("", "Baru123", "Baru123")),
            Err(ContentError::MissingField("current_password"))
        ));
        assert!(matches!(
            svc.change_password(id, &change("keliru", "Baru123", "Baru123")),
            Err(ContentError::WrongPassword)
        ));
        assert!(matches!(
            svc.change_password(id, &change("Rahasia1", "baru123", "baru123")),
            Err(ContentError::WeakPassword(_))
        ));
        assert!(matches!(
            svc.change_password(id, &change("Rahasia1", "Baru123", "Baru124")),
            Err(ContentError::PasswordMismatch)
        ));

        svc.change_password(id, &change("Rahasia1", "Baru123", "Baru123")).unwrap();
        assert!(svc.authenticate(&login("rina@medayu.org", "Baru123")).is_ok());
        assert!(svc.authenticate(&login("rina@medayu.org", "Rahasia1")).is_err());
    }

    #[test]
    fn dashboard_counts_carousel_photos() {
        let (mut svc, _root) = service();
        svc.create_slide(slide("1", Some(png()))).unwrap();
        svc.create_slide(slide("2", Some(png()))).unwrap();
        assert_eq!(svc.dashboard().unwrap().carousel_photos, 2);
    }
}
