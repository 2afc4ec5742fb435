//! Proximity thresholds deciding when a position counts as a visit.
//!
//! Two independent thresholds exist. The proximity buffer decides reward
//! eligibility; the attraction proximity range backs a coarser "in the
//! vicinity" predicate for callers outside the reward engine. Both are held
//! in a [`ProximityConfig`] value passed explicitly into each calculation.

use thiserror::Error;

use crate::{PointOfInterest, Position, VisitedPosition, distance};

/// Default reward eligibility threshold in statute miles.
pub const DEFAULT_PROXIMITY_BUFFER_MILES: f64 = 10.0;

/// Default range for [`ProximityConfig::is_within_attraction_proximity`].
pub const DEFAULT_ATTRACTION_PROXIMITY_RANGE_MILES: f64 = 200.0;

/// Errors returned when building a [`ProximityConfig`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProximityError {
    /// A threshold was negative, infinite or `NaN`.
    #[error("{name} must be a finite, non-negative distance in miles (got {value})")]
    InvalidThreshold {
        /// Name of the offending threshold.
        name: &'static str,
        /// Value supplied by the caller.
        value: f64,
    },
}

/// Distance thresholds used by the proximity predicates.
///
/// # Examples
/// ```
/// use tourguide_core::ProximityConfig;
///
/// let config = ProximityConfig::default().with_proximity_buffer(25.0)?;
/// assert_eq!(config.proximity_buffer(), 25.0);
/// assert_eq!(config.attraction_proximity_range(), 200.0);
/// # Ok::<(), tourguide_core::ProximityError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityConfig {
    proximity_buffer: f64,
    attraction_proximity_range: f64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            proximity_buffer: DEFAULT_PROXIMITY_BUFFER_MILES,
            attraction_proximity_range: DEFAULT_ATTRACTION_PROXIMITY_RANGE_MILES,
        }
    }
}

impl ProximityConfig {
    /// Validate and construct a configuration from both thresholds.
    ///
    /// # Errors
    /// Returns [`ProximityError::InvalidThreshold`] when either threshold is
    /// negative or not finite.
    pub fn new(
        proximity_buffer: f64,
        attraction_proximity_range: f64,
    ) -> Result<Self, ProximityError> {
        Ok(Self {
            proximity_buffer: validate("proximity buffer", proximity_buffer)?,
            attraction_proximity_range: validate(
                "attraction proximity range",
                attraction_proximity_range,
            )?,
        })
    }

    /// Return a copy with a different reward eligibility threshold.
    ///
    /// # Errors
    /// Returns [`ProximityError::InvalidThreshold`] for negative or
    /// non-finite values.
    pub fn with_proximity_buffer(self, miles: f64) -> Result<Self, ProximityError> {
        Ok(Self {
            proximity_buffer: validate("proximity buffer", miles)?,
            ..self
        })
    }

    /// Return a copy with the reward threshold restored to its default.
    #[must_use]
    pub const fn with_default_proximity_buffer(self) -> Self {
        Self {
            proximity_buffer: DEFAULT_PROXIMITY_BUFFER_MILES,
            ..self
        }
    }

    /// Reward eligibility threshold in statute miles.
    #[must_use]
    pub const fn proximity_buffer(&self) -> f64 {
        self.proximity_buffer
    }

    /// Coarse vicinity threshold in statute miles.
    #[must_use]
    pub const fn attraction_proximity_range(&self) -> f64 {
        self.attraction_proximity_range
    }

    /// Whether `visited` is close enough to `poi` to count as a visit.
    #[must_use]
    pub fn near_attraction(&self, visited: &VisitedPosition, poi: &PointOfInterest) -> bool {
        distance(poi.position, visited.position) <= self.proximity_buffer
    }

    /// Whether `position` lies within the attraction proximity range of `poi`.
    #[must_use]
    pub fn is_within_attraction_proximity(&self, poi: &PointOfInterest, position: &Position) -> bool {
        distance(poi.position, *position) <= self.attraction_proximity_range
    }
}

fn validate(name: &'static str, value: f64) -> Result<f64, ProximityError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ProximityError::InvalidThreshold { name, value })
    }
}
