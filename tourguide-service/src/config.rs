//! Runtime configuration for [`TourGuideService`](crate::TourGuideService).

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tourguide_core::{
    DEFAULT_ATTRACTION_PROXIMITY_RANGE_MILES, DEFAULT_PROXIMITY_BUFFER_MILES, DedupPolicy,
    FailureMode, ProximityConfig, ProximityError,
};

/// Worker threads used when tracking positions in bulk.
pub const DEFAULT_TRACKING_POOL_SIZE: usize = 30;

/// Worker threads used when calculating rewards in bulk.
pub const DEFAULT_REWARDS_POOL_SIZE: usize = 50;

/// Pause between two tracker passes.
pub const DEFAULT_TRACKER_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Credential sent with every pricing request unless overridden.
pub const DEFAULT_PRICING_API_KEY: &str = "test-server-api-key";

/// Tunable settings for the orchestration service.
///
/// # Examples
/// ```
/// use tourguide_service::ServiceConfig;
///
/// let config = ServiceConfig {
///     rewards_pool_size: 8,
///     ..ServiceConfig::default()
/// };
/// assert_eq!(config.tracking_pool_size, 30);
/// assert_eq!(config.proximity()?.proximity_buffer(), 10.0);
/// # Ok::<(), tourguide_core::ProximityError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ServiceConfig {
    /// Size of the pool running `track_positions_batch`.
    pub tracking_pool_size: usize,
    /// Size of the pool running `calculate_rewards_batch`.
    pub rewards_pool_size: usize,
    /// How both pools react to failing units.
    pub failure_mode: FailureMode,
    /// Initial reward eligibility threshold in miles.
    pub proximity_buffer_miles: f64,
    /// Coarse vicinity threshold in miles.
    pub attraction_proximity_range_miles: f64,
    /// How existing rewards are matched against attractions.
    pub dedup: DedupPolicy,
    /// Pause between tracker passes.
    pub tracker_interval: Duration,
    /// Credential forwarded to the pricing provider.
    pub pricing_api_key: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            tracking_pool_size: DEFAULT_TRACKING_POOL_SIZE,
            rewards_pool_size: DEFAULT_REWARDS_POOL_SIZE,
            failure_mode: FailureMode::default(),
            proximity_buffer_miles: DEFAULT_PROXIMITY_BUFFER_MILES,
            attraction_proximity_range_miles: DEFAULT_ATTRACTION_PROXIMITY_RANGE_MILES,
            dedup: DedupPolicy::default(),
            tracker_interval: DEFAULT_TRACKER_INTERVAL,
            pricing_api_key: DEFAULT_PRICING_API_KEY.to_owned(),
        }
    }
}

impl ServiceConfig {
    /// Validate the proximity thresholds.
    ///
    /// # Errors
    /// Returns [`ProximityError::InvalidThreshold`] when either threshold is
    /// negative or not finite.
    pub fn proximity(&self) -> Result<ProximityConfig, ProximityError> {
        ProximityConfig::new(
            self.proximity_buffer_miles,
            self.attraction_proximity_range_miles,
        )
    }
}
