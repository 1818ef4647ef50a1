//! The [`ContentStore`] trait defining the storage contract for site content.
//!
//! One section per content family, each a narrow CRUD surface. Lookups
//! return `Ok(None)` for a missing id; updates of a missing id return the
//! family's not-found error; deletes report whether a row was removed.
//!
//! All backends (InMemoryStore, SqliteStore) implement this trait and are
//! swappable without changing the service layer.

use medayu_core::model::{AnnouncementFields, ProfileFields, SlideFields};
use medayu_core::{
    Announcement, AnnouncementId, CarouselSlide, DashboardCounts, Manager, ManagerId, Ordinal,
    Profile, ProfileId, ProfileKind, SlideId,
};

use crate::error::StorageError;

/// The storage contract for site content.
///
/// The trait is synchronous; the server serializes access behind a single
/// async mutex.
pub trait ContentStore {
    // -------------------------------------------------------------------
    // Carousel slides
    // -------------------------------------------------------------------

    /// Lists all slides ordered by ordinal.
    fn list_slides(&self) -> Result<Vec<CarouselSlide>, StorageError>;

    /// Ordinals currently held by slides, ascending.
    fn used_ordinals(&self) -> Result<Vec<Ordinal>, StorageError>;

    /// Number of stored slides.
    fn count_slides(&self) -> Result<u64, StorageError>;

    /// Retrieves a slide by ID.
    fn get_slide(&self, id: SlideId) -> Result<Option<CarouselSlide>, StorageError>;

    /// Inserts a slide.
    ///
    /// The capacity and ordinal checks are repeated inside the write so a
    /// racing writer gets [`StorageError::CapacityExceeded`] or
    /// [`StorageError::OrdinalTaken`] instead of a ninth or duplicate row.
    fn insert_slide(&mut self, fields: &SlideFields) -> Result<SlideId, StorageError>;

    /// Overwrites a slide's file name and ordinal.
    fn update_slide(&mut self, id: SlideId, fields: &SlideFields) -> Result<(), StorageError>;

    /// Deletes a slide. Returns `false` if no such slide existed.
    fn delete_slide(&mut self, id: SlideId) -> Result<bool, StorageError>;

    // -------------------------------------------------------------------
    // Profiles (supervisors, advisors, partners)
    // -------------------------------------------------------------------

    /// Lists profiles of one kind ordered by ID.
    fn list_profiles(&self, kind: ProfileKind) -> Result<Vec<Profile>, StorageError>;

    /// Retrieves a profile of the given kind.
    fn get_profile(
        &self,
        kind: ProfileKind,
        id: ProfileId,
    ) -> Result<Option<Profile>, StorageError>;

    /// Inserts a profile.
    fn insert_profile(
        &mut self,
        kind: ProfileKind,
        fields: &ProfileFields,
    ) -> Result<ProfileId, StorageError>;

    /// Overwrites a profile's name and photo.
    fn update_profile(
        &mut self,
        kind: ProfileKind,
        id: ProfileId,
        fields: &ProfileFields,
    ) -> Result<(), StorageError>;

    /// Deletes a profile. Returns `false` if no such profile existed.
    fn delete_profile(&mut self, kind: ProfileKind, id: ProfileId) -> Result<bool, StorageError>;

    // -------------------------------------------------------------------
    // Announcements
    // -------------------------------------------------------------------

    /// Lists announcements ordered by ID.
    fn list_announcements(&self) -> Result<Vec<Announcement>, StorageError>;

    /// Retrieves an announcement by ID.
    fn get_announcement(&self, id: AnnouncementId) -> Result<Option<Announcement>, StorageError>;

    /// Inserts an announcement.
    fn insert_announcement(
        &mut self,
        fields: &AnnouncementFields,
    ) -> Result<AnnouncementId, StorageError>;

    /// Overwrites an announcement.
    fn update_announcement(
        &mut self,
        id: AnnouncementId,
        fields: &AnnouncementFields,
    ) -> Result<(), StorageError>;

    /// Deletes an announcement. Returns `false` if none existed.
    fn delete_announcement(&mut self, id: AnnouncementId) -> Result<bool, StorageError>;

    // -------------------------------------------------------------------
    // Manager accounts
    // -------------------------------------------------------------------

    /// Retrieves a manager by ID.
    fn get_manager(&self, id: ManagerId) -> Result<Option<Manager>, StorageError>;

    /// Finds a manager by email (exact match after trimming).
    fn find_manager_by_email(&self, email: &str) -> Result<Option<Manager>, StorageError>;

    /// Registers a manager with an already-hashed password.
    fn insert_manager(
        &mut self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<ManagerId, StorageError>;

    /// Replaces a manager's password hash.
    fn update_manager_password(
        &mut self,
        id: ManagerId,
        password_hash: &str,
    ) -> Result<(), StorageError>;

    // -------------------------------------------------------------------
    // Dashboard
    // -------------------------------------------------------------------

    /// Counts shown on the manager dashboard.
    fn dashboard_counts(&self) -> Result<DashboardCounts, StorageError>;
}
