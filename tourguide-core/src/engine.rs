//! Reward calculation for a single user.
//!
//! The engine reads a consistent view of the user's ledger, computes the
//! rewards implied by the position history against a catalog snapshot and
//! applies them in one append. A provider failure aborts the whole call
//! before anything is stored.

use thiserror::Error;

use crate::{
    CatalogProvider, DedupPolicy, PointsProvider, ProviderError, ProximityConfig, Reward,
    UserRecord,
};

/// Errors returned by [`RewardEngine::calculate_rewards`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewardError {
    /// The catalog provider returned no attractions.
    #[error("the attraction catalog is empty")]
    EmptyCatalog,
    /// A provider call failed.
    #[error("reward calculation failed: {0}")]
    Provider(#[from] ProviderError),
}

/// Grants rewards for visits of catalog attractions.
///
/// # Examples
/// ```
/// use tourguide_core::test_support::{FixedPointsProvider, MemoryCatalog, reference_attractions};
/// use tourguide_core::{ContactInfo, ProximityConfig, RewardEngine, UserRecord, VisitedPosition};
/// use uuid::Uuid;
///
/// let attractions = reference_attractions();
/// let engine = RewardEngine::new(
///     MemoryCatalog::with_pois(attractions.clone()),
///     FixedPointsProvider::new(100),
/// );
/// let user = UserRecord::new(Uuid::new_v4(), "jon", ContactInfo::default());
/// user.record_position(VisitedPosition::now(user.id(), attractions[0].position));
///
/// let granted = engine.calculate_rewards(&user, &ProximityConfig::default())?;
/// assert_eq!(granted.len(), 1);
/// assert_eq!(user.cumulative_points(), 100);
/// # Ok::<(), tourguide_core::RewardError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RewardEngine<C, P> {
    catalog: C,
    points: P,
    dedup: DedupPolicy,
}

impl<C, P> RewardEngine<C, P>
where
    C: CatalogProvider,
    P: PointsProvider,
{
    /// Construct an engine that deduplicates by attraction identity.
    pub const fn new(catalog: C, points: P) -> Self {
        Self::with_dedup(catalog, points, DedupPolicy::PointOfInterestId)
    }

    /// Construct an engine with an explicit deduplication policy.
    pub const fn with_dedup(catalog: C, points: P, dedup: DedupPolicy) -> Self {
        Self {
            catalog,
            points,
            dedup,
        }
    }

    /// Deduplication policy in effect.
    #[must_use]
    pub const fn dedup(&self) -> DedupPolicy {
        self.dedup
    }

    /// Compute and store the rewards `user` has earned but not yet received.
    ///
    /// Every (visited position, attraction) pair is examined in history then
    /// catalog order. A pair yields a reward when the position is within the
    /// proximity buffer and no existing or newly created reward already
    /// covers the attraction. Calling this twice against an unchanged
    /// history and catalog grants nothing the second time.
    ///
    /// Returns the rewards that were stored.
    ///
    /// # Errors
    /// Returns [`RewardError::EmptyCatalog`] when the catalog has no entries
    /// and [`RewardError::Provider`] when a provider call fails; in both
    /// cases the user's rewards are left untouched.
    pub fn calculate_rewards(
        &self,
        user: &UserRecord,
        proximity: &ProximityConfig,
    ) -> Result<Vec<Reward>, RewardError> {
        let history = user.history();
        let mut known = user.rewards();
        let catalog = self.catalog.points_of_interest()?;
        if catalog.is_empty() {
            return Err(RewardError::EmptyCatalog);
        }

        let mut pending = Vec::new();
        for visited in &history {
            for poi in &catalog {
                if !proximity.near_attraction(visited, poi)
                    || known.iter().any(|reward| self.dedup.covers(reward, poi))
                {
                    continue;
                }
                let points = self.points.reward_points(poi.id, user.id())?;
                let reward = Reward::new(visited.clone(), poi.clone(), points);
                known.push(reward.clone());
                pending.push(reward);
            }
        }

        let committed = user.commit_rewards(pending, self.dedup);
        log::debug!(
            "granted {} reward(s) to user {} from {} position(s)",
            committed.len(),
            user.id(),
            history.len()
        );
        Ok(committed)
    }
}
