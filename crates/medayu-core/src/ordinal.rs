//! Carousel ordinals and slot allocation.
//!
//! The homepage carousel has [`MAX_SLIDES`] display positions. Each slide
//! holds exactly one [`Ordinal`] and no two slides share one. [`SlotMap`] is
//! a snapshot of which ordinals are taken; it is built fresh from the store
//! for every check and never cached, since nothing spans the window between
//! the check and the write.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Number of carousel positions, and so the maximum number of slides.
pub const MAX_SLIDES: u8 = 8;

/// A carousel display position in `1..=MAX_SLIDES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Ordinal(u8);

impl Ordinal {
    /// Builds an ordinal from an integer, rejecting values outside the range.
    pub fn new(value: i64) -> Result<Self, CoreError> {
        if (1..=MAX_SLIDES as i64).contains(&value) {
            Ok(Ordinal(value as u8))
        } else {
            Err(CoreError::OrdinalOutOfRange {
                value,
                max: MAX_SLIDES,
            })
        }
    }

    /// Parses a submitted form value.
    ///
    /// Blank or non-integer input yields [`CoreError::InvalidOrdinal`];
    /// an integer outside the range yields [`CoreError::OrdinalOutOfRange`].
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        let value: i64 = trimmed.parse().map_err(|_| CoreError::InvalidOrdinal {
            raw: raw.to_string(),
        })?;
        Self::new(value)
    }

    /// The numeric position.
    pub fn get(self) -> u8 {
        self.0
    }

    /// All ordinals in display order.
    pub fn all() -> impl Iterator<Item = Ordinal> {
        (1..=MAX_SLIDES).map(Ordinal)
    }
}

impl TryFrom<i64> for Ordinal {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Ordinal::new(value)
    }
}

impl From<Ordinal> for u8 {
    fn from(ordinal: Ordinal) -> Self {
        ordinal.0
    }
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of the ordinals currently assigned to slides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotMap {
    used: BTreeSet<Ordinal>,
}

impl SlotMap {
    /// Builds a snapshot from the ordinals held by existing slides.
    pub fn from_used<I>(used: I) -> Self
    where
        I: IntoIterator<Item = Ordinal>,
    {
        SlotMap {
            used: used.into_iter().collect(),
        }
    }

    /// All assigned ordinals, ascending.
    pub fn used(&self) -> &BTreeSet<Ordinal> {
        &self.used
    }

    /// Ordinals a slide may take, ascending.
    ///
    /// `excluding` is the ordinal the edited slide already holds, which stays
    /// selectable for that slide even though it is in use.
    pub fn available(&self, excluding: Option<Ordinal>) -> Vec<Ordinal> {
        Ordinal::all()
            .filter(|o| self.is_free(*o, excluding))
            .collect()
    }

    /// Whether `ordinal` can be assigned, treating `excluding` as free.
    pub fn is_free(&self, ordinal: Ordinal, excluding: Option<Ordinal>) -> bool {
        !self.used.contains(&ordinal) || excluding == Some(ordinal)
    }

    /// Whether every position is taken.
    pub fn is_full(&self) -> bool {
        self.used.len() >= MAX_SLIDES as usize
    }
}
