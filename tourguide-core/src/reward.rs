//! Rewards granted for visiting points of interest.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{PointOfInterest, VisitedPosition};

/// Points awarded for one visit of one point of interest.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reward {
    /// The fix that qualified as a visit.
    pub visited_position: VisitedPosition,
    /// The attraction that was visited.
    pub point_of_interest: PointOfInterest,
    /// Points granted by the points provider.
    pub points: u32,
}

impl Reward {
    /// Construct a reward.
    #[must_use]
    pub const fn new(
        visited_position: VisitedPosition,
        point_of_interest: PointOfInterest,
        points: u32,
    ) -> Self {
        Self {
            visited_position,
            point_of_interest,
            points,
        }
    }
}

/// How an existing reward is matched against a candidate point of interest.
///
/// Matching by name reproduces the legacy behaviour, which merges distinct
/// attractions that share a display name. Prefer identity matching unless
/// exact parity with that behaviour is required.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DedupPolicy {
    /// Match on the catalog identifier.
    #[default]
    PointOfInterestId,
    /// Match on the display name.
    LegacyName,
}

impl DedupPolicy {
    /// Whether `reward` already covers `poi` under this policy.
    #[must_use]
    pub fn covers(self, reward: &Reward, poi: &PointOfInterest) -> bool {
        match self {
            Self::PointOfInterestId => reward.point_of_interest.id == poi.id,
            Self::LegacyName => reward.point_of_interest.name == poi.name,
        }
    }
}
