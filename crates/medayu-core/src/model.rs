//! Record shapes for every content family.
//!
//! Each family has a stored record (with its id) and a `*Fields` struct
//! holding the writable columns, used for both insert and update.
//! File-name fields always hold a bare file name relative to the family's
//! image directory, never a path.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{AnnouncementId, ManagerId, ProfileId, SlideId};
use crate::ordinal::Ordinal;

/// A homepage carousel entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselSlide {
    pub id: SlideId,
    pub image_file_name: String,
    pub ordinal: Ordinal,
}

/// Writable columns of a [`CarouselSlide`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideFields {
    pub image_file_name: String,
    pub ordinal: Ordinal,
}

/// The three listings that share the name + photo shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    /// Supervisory board members ("pengawas").
    Supervisor,
    /// Advisory board members ("pembina").
    Advisor,
    /// Partner organisations ("sahabat medayu").
    Partner,
}

impl ProfileKind {
    pub const ALL: [ProfileKind; 3] = [
        ProfileKind::Supervisor,
        ProfileKind::Advisor,
        ProfileKind::Partner,
    ];

    /// Plural URL segment, e.g. `supervisors`.
    pub fn slug(self) -> &'static str {
        match self {
            ProfileKind::Supervisor => "supervisors",
            ProfileKind::Advisor => "advisors",
            ProfileKind::Partner => "partners",
        }
    }

    /// Human-readable singular name used in flash messages.
    pub fn label(self) -> &'static str {
        match self {
            ProfileKind::Supervisor => "Supervisor",
            ProfileKind::Advisor => "Advisor",
            ProfileKind::Partner => "Partner",
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// A supervisor, advisor or partner listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub kind: ProfileKind,
    pub name: String,
    pub photo: String,
}

/// Writable columns of a [`Profile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFields {
    pub name: String,
    pub photo: String,
}

/// A news item shown on the public site. The photo is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: AnnouncementId,
    pub title: String,
    pub body: String,
    pub photo: Option<String>,
}

/// Writable columns of an [`Announcement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementFields {
    pub title: String,
    pub body: String,
    pub photo: Option<String>,
}

/// A manager account. The hash is bcrypt and never serialized.
#[derive(Clone, PartialEq, Eq)]
pub struct Manager {
    pub id: ManagerId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Counters shown on the manager dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardCounts {
    pub carousel_photos: u64,
    pub visits: u64,
    pub internships: u64,
}
