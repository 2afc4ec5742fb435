//! Geographic positions and the great-circle distance between them.
//!
//! Distances are reported in statute miles using the spherical law of
//! cosines. Coordinates are WGS84 degrees and are not validated.

use chrono::{DateTime, Utc};
use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Statute miles in one nautical mile.
pub const STATUTE_MILES_PER_NAUTICAL_MILE: f64 = 1.150_779_45;

/// Nautical miles subtended by one degree of arc.
const NAUTICAL_MILES_PER_DEGREE: f64 = 60.0;

/// A latitude/longitude pair in degrees. The default is the origin.
///
/// # Examples
/// ```
/// use tourguide_core::Position;
///
/// let boston = Position::new(42.302_601, -71.086_731);
/// assert_eq!(boston.distance_to(&boston), 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Position {
    /// Construct a position from latitude and longitude in degrees.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Distance to `other` in statute miles.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        distance(*self, *other)
    }
}

/// `geo` coordinates use `x = longitude` and `y = latitude`.
impl From<Coord<f64>> for Position {
    fn from(coord: Coord<f64>) -> Self {
        Self::new(coord.y, coord.x)
    }
}

impl From<Position> for Coord<f64> {
    fn from(position: Position) -> Self {
        Self {
            x: position.longitude,
            y: position.latitude,
        }
    }
}

/// Great-circle distance between `a` and `b` in statute miles.
///
/// The result is symmetric and zero for identical positions. The cosine of
/// the central angle is clamped to `[-1, 1]` so rounding at identical or
/// antipodal points never yields `NaN`.
///
/// # Examples
/// ```
/// use tourguide_core::{Position, distance};
///
/// let zoo = Position::new(42.302_601, -71.086_731);
/// let bronx = Position::new(40.852_905, -73.872_971);
/// let miles = distance(zoo, bronx);
/// assert!((miles - 175.28).abs() < 0.01);
/// assert_eq!(miles, distance(bronx, zoo));
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "the spherical law of cosines is floating-point trigonometry"
)]
pub fn distance(a: Position, b: Position) -> f64 {
    if a == b {
        return 0.0;
    }
    let lat1 = a.latitude.to_radians();
    let lon1 = a.longitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let lon2 = b.longitude.to_radians();

    let cosine = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon1 - lon2).cos();
    let angle = cosine.clamp(-1.0, 1.0).acos();

    let nautical_miles = NAUTICAL_MILES_PER_DEGREE * angle.to_degrees();
    STATUTE_MILES_PER_NAUTICAL_MILE * nautical_miles
}

/// A timestamped position fix recorded for a user.
///
/// Visited positions are immutable facts appended to a user's history.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VisitedPosition {
    /// User the fix belongs to.
    pub user_id: Uuid,
    /// Where the user was.
    pub position: Position,
    /// When the fix was taken.
    pub timestamp: DateTime<Utc>,
}

impl VisitedPosition {
    /// Construct a visited position with an explicit timestamp.
    #[must_use]
    pub const fn new(user_id: Uuid, position: Position, timestamp: DateTime<Utc>) -> Self {
        Self {
            user_id,
            position,
            timestamp,
        }
    }

    /// Construct a visited position stamped with the current time.
    #[must_use]
    pub fn now(user_id: Uuid, position: Position) -> Self {
        Self::new(user_id, position, Utc::now())
    }
}
