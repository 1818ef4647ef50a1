//! In-memory implementation of [`ContentStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests and local previews.
//! It keeps each family in a `BTreeMap` keyed by ID with the same semantics
//! as the SQLite backend, including the carousel constraints.

use std::collections::BTreeMap;

use medayu_core::model::{AnnouncementFields, ProfileFields, SlideFields};
use medayu_core::{
    Announcement, AnnouncementId, CarouselSlide, DashboardCounts, Manager, ManagerId, Ordinal,
    Profile, ProfileId, ProfileKind, SlideId, MAX_SLIDES,
};

use crate::error::StorageError;
use crate::traits::ContentStore;

/// In-memory content store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    slides: BTreeMap<SlideId, CarouselSlide>,
    profiles: BTreeMap<ProfileId, Profile>,
    announcements: BTreeMap<AnnouncementId, Announcement>,
    managers: BTreeMap<ManagerId, Manager>,
    visits: u64,
    internships: u64,
    /// Last issued row ID, shared by every family.
    last_id: i64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the externally maintained visit and internship counters.
    pub fn set_external_counts(&mut self, visits: u64, internships: u64) {
        self.visits = visits;
        self.internships = internships;
    }

    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn ordinal_holder(&self, ordinal: Ordinal) -> Option<SlideId> {
        self.slides
            .values()
            .find(|s| s.ordinal == ordinal)
            .map(|s| s.id)
    }
}

impl ContentStore for InMemoryStore {
    // -------------------------------------------------------------------
    // Carousel slides
    // -------------------------------------------------------------------

    fn list_slides(&self) -> Result<Vec<CarouselSlide>, StorageError> {
        let mut slides: Vec<_> = self.slides.values().cloned().collect();
        slides.sort_by_key(|s| s.ordinal);
        Ok(slides)
    }

    fn used_ordinals(&self) -> Result<Vec<Ordinal>, StorageError> {
        let mut used: Vec<_> = self.slides.values().map(|s| s.ordinal).collect();
        used.sort();
        Ok(used)
    }

    fn count_slides(&self) -> Result<u64, StorageError> {
        Ok(self.slides.len() as u64)
    }

    fn get_slide(&self, id: SlideId) -> Result<Option<CarouselSlide>, StorageError> {
        Ok(self.slides.get(&id).cloned())
    }

    fn insert_slide(&mut self, fields: &SlideFields) -> Result<SlideId, StorageError> {
        if self.slides.len() >= MAX_SLIDES as usize {
            return Err(StorageError::CapacityExceeded { max: MAX_SLIDES });
        }
        if self.ordinal_holder(fields.ordinal).is_some() {
            return Err(StorageError::OrdinalTaken(fields.ordinal));
        }
        let id = SlideId(self.next_id());
        self.slides.insert(
            id,
            CarouselSlide {
                id,
                image_file_name: fields.image_file_name.clone(),
                ordinal: fields.ordinal,
            },
        );
        Ok(id)
    }

    fn update_slide(&mut self, id: SlideId, fields: &SlideFields) -> Result<(), StorageError> {
        if !self.slides.contains_key(&id) {
            return Err(StorageError::SlideNotFound(id));
        }
        if let Some(holder) = self.ordinal_holder(fields.ordinal) {
            if holder != id {
                return Err(StorageError::OrdinalTaken(fields.ordinal));
            }
        }
        let slide = self
            .slides
            .get_mut(&id)
            .ok_or(StorageError::SlideNotFound(id))?;
        slide.image_file_name = fields.image_file_name.clone();
        slide.ordinal = fields.ordinal;
        Ok(())
    }

    fn delete_slide(&mut self, id: SlideId) -> Result<bool, StorageError> {
        Ok(self.slides.remove(&id).is_some())
    }

    // -------------------------------------------------------------------
    // Profiles
    // -------------------------------------------------------------------

    fn list_profiles(&self, kind: ProfileKind) -> Result<Vec<Profile>, StorageError> {
        Ok(self
            .profiles
            .values()
            .filter(|p| p.kind == kind)
            .cloned()
            .collect())
    }

    fn get_profile(
        &self,
        kind: ProfileKind,
        id: ProfileId,
    ) -> Result<Option<Profile>, StorageError> {
        Ok(self.profiles.get(&id).filter(|p| p.kind == kind).cloned())
    }

    fn insert_profile(
        &mut self,
        kind: ProfileKind,
        fields: &ProfileFields,
    ) -> Result<ProfileId, StorageError> {
        let id = ProfileId(self.next_id());
        self.profiles.insert(
            id,
            Profile {
                id,
                kind,
                name: fields.name.clone(),
                photo: fields.photo.clone(),
            },
        );
        Ok(id)
    }

    fn update_profile(
        &mut self,
        kind: ProfileKind,
        id: ProfileId,
        fields: &ProfileFields,
    ) -> Result<(), StorageError> {
        match self.profiles.get_mut(&id) {
            Some(profile) if profile.kind == kind => {
                profile.name = fields.name.clone();
                profile.photo = fields.photo.clone();
                Ok(())
            }
            _ => Err(StorageError::ProfileNotFound { kind, id }),
        }
    }

    fn delete_profile(&mut self, kind: ProfileKind, id: ProfileId) -> Result<bool, StorageError> {
        match self.profiles.get(&id) {
            Some(profile) if profile.kind == kind => {
                self.profiles.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    // -------------------------------------------------------------------
    // Announcements
    // -------------------------------------------------------------------

    fn list_announcements(&self) -> Result<Vec<Announcement>, StorageError> {
        Ok(self.announcements.values().cloned().collect())
    }

    fn get_announcement(&self, id: AnnouncementId) -> Result<Option<Announcement>, StorageError> {
        Ok(self.announcements.get(&id).cloned())
    }

    fn insert_announcement(
        &mut self,
        fields: &AnnouncementFields,
    ) -> Result<AnnouncementId, StorageError> {
        let id = AnnouncementId(self.next_id());
        self.announcements.insert(
            id,
            Announcement {
                id,
                title: fields.title.clone(),
                body: fields.body.clone(),
                photo: fields.photo.clone(),
            },
        );
        Ok(id)
    }

    fn update_announcement(
        &mut self,
        id: AnnouncementId,
        fields: &AnnouncementFields,
    ) -> Result<(), StorageError> {
        let announcement = self
            .announcements
            .get_mut(&id)
            .ok_or(StorageError::AnnouncementNotFound(id))?;
        announcement.title = fields.title.clone();
        announcement.body = fields.body.clone();
        announcement.photo = fields.photo.clone();
        Ok(())
    }

    fn delete_announcement(&mut self, id: AnnouncementId) -> Result<bool, StorageError> {
        Ok(self.announcements.remove(&id).is_some())
    }

    // -------------------------------------------------------------------
    // Manager accounts
    // -------------------------------------------------------------------

    fn get_manager(&self, id: ManagerId) -> Result<Option<Manager>, StorageError> {
        Ok(self.managers.get(&id).cloned())
    }

    fn find_manager_by_email(&self, email: &str) -> Result<Option<Manager>, StorageError> {
        let email = email.trim();
        Ok(self.managers.values().find(|m| m.email == email).cloned())
    }

    fn insert_manager(
        &mut self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<ManagerId, StorageError> {
        let email = email.trim();
        if self.managers.values().any(|m| m.email == email) {
            return Err(StorageError::DuplicateEmail(email.to_string()));
        }
        let id = ManagerId(self.next_id());
        self.managers.insert(
            id,
            Manager {
                id,
                name: name.to_string(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(id)
    }

    fn update_manager_password(
        &mut self,
        id: ManagerId,
        password_hash: &str,
    ) -> Result<(), StorageError> {
        let manager = self
            .managers
            .get_mut(&id)
            .ok_or(StorageError::ManagerNotFound(id))?;
        manager.password_hash = password_hash.to_string();
        Ok(())
    }

    // -------------------------------------------------------------------
    // Dashboard
    // -------------------------------------------------------------------

    fn dashboard_counts(&self) -> Result<DashboardCounts, StorageError> {
        Ok(DashboardCounts {
            carousel_photos: self.slides.len() as u64,
            visits: self.visits,
            internships: self.internships,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conformance;

    #[test]
    fn slide_crud() {
        conformance::slide_crud(InMemoryStore::new());
    }

    #[test]
    fn slide_constraints() {
        conformance::slide_constraints(InMemoryStore::new());
    }

    #[test]
    fn profile_kinds_are_isolated() {
        conformance::profile_kinds_are_isolated(InMemoryStore::new());
    }

    #[test]
    fn announcement_crud() {
        conformance::announcement_crud(InMemoryStore::new());
    }

    #[test]
    fn manager_accounts() {
        conformance::manager_accounts(InMemoryStore::new());
    }

    #[test]
    fn dashboard_counts_include_external_tables() {
        let mut store = InMemoryStore::new();
        store.set_external_counts(5, 2);
        conformance::insert_slides(&mut store, &[1, 2]);
        let counts = store.dashboard_counts().unwrap();
        assert_eq!(
            counts,
            DashboardCounts {
                carousel_photos: 2,
                visits: 5,
                internships: 2,
            }
        );
    }
}
