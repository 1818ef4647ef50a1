//! Domain model for the Medayu content backend.
//!
//! Everything here is pure: record shapes, identifiers, the carousel ordinal
//! and slot map, accepted upload media types, and the manager password
//! policy. Persistence lives in `medayu-storage`; HTTP and file handling live
//! in `medayu-server`.

pub mod error;
pub mod id;
pub mod media;
pub mod model;
pub mod ordinal;
pub mod password;

// Re-export commonly used types
pub use error::CoreError;
pub use id::{AnnouncementId, ManagerId, ProfileId, SlideId};
pub use media::MediaType;
pub use model::{
    Announcement, AnnouncementFields, CarouselSlide, DashboardCounts, Manager, Profile,
    ProfileFields, ProfileKind, SlideFields,
};
pub use ordinal::{Ordinal, SlotMap, MAX_SLIDES};
