use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Position;

/// A named location in the attraction catalog.
///
/// # Examples
/// ```
/// use tourguide_core::{PointOfInterest, Position};
/// use uuid::Uuid;
///
/// let poi = PointOfInterest::new(Uuid::nil(), "Bronx Zoo", Position::new(40.85, -73.87));
/// assert_eq!(poi.name, "Bronx Zoo");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointOfInterest {
    /// Stable catalog identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Where the attraction is.
    pub position: Position,
}

impl PointOfInterest {
    /// Construct a `PointOfInterest`.
    #[must_use]
    pub fn new(id: Uuid, name: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            position,
        }
    }
}
