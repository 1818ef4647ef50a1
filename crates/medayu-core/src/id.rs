//! Stable ID newtypes for stored records.
//!
//! All IDs are distinct newtype wrappers over `i64` (SQLite's
//! `INTEGER PRIMARY KEY`), so a `SlideId` cannot be passed where a
//! `ProfileId` is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Homepage carousel slide identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideId(pub i64);

/// Supervisor, advisor or partner identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub i64);

/// Announcement identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnouncementId(pub i64);

/// Manager account identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManagerId(pub i64);

// Display implementations -- just print the inner value.

impl fmt::Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for AnnouncementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ManagerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slide_id_display() {
        assert_eq!(format!("{}", SlideId(7)), "7");
    }

    #[test]
    fn manager_id_display() {
        assert_eq!(format!("{}", ManagerId(12)), "12");
    }

    #[test]
    fn ids_serialize_as_bare_integers() {
        let json = serde_json::to_string(&ProfileId(42)).unwrap();
        assert_eq!(json, "42");
        let back: AnnouncementId = serde_json::from_str("9").unwrap();
        assert_eq!(back, AnnouncementId(9));
    }
}
