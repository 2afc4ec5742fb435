//! Nearest-attraction ranking.
//!
//! Ranking is a read-only query: it sorts a catalog snapshot by distance from
//! a position and annotates the closest entries with distance and points.
//! Points are looked up afresh for every entry on every call.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    CatalogProvider, PointOfInterest, PointsProvider, Position, ProviderError, VisitedPosition,
    distance,
};

/// Number of attractions returned when no limit is configured.
pub const DEFAULT_NEARBY_LIMIT: usize = 5;

/// Errors returned by [`AttractionRanker`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankingError {
    /// The ranking limit was zero.
    #[error("the nearby attraction limit must be at least one")]
    ZeroLimit,
    /// The catalog provider returned no attractions.
    #[error("the attraction catalog is empty")]
    EmptyCatalog,
    /// A provider call failed.
    #[error("ranking failed: {0}")]
    Provider(#[from] ProviderError),
}

/// One ranked attraction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NearbyAttraction {
    /// Attraction name.
    pub name: String,
    /// Attraction position.
    pub position: Position,
    /// Distance from the query position in statute miles.
    pub distance: f64,
    /// Points the user would earn for visiting.
    pub points: u32,
}

/// Ranked attractions around a position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NearbyAttractions {
    /// The query position.
    pub position: Position,
    /// Closest attractions, nearest first.
    pub attractions: Vec<NearbyAttraction>,
}

/// Return the `limit` attractions closest to `position`, nearest first.
///
/// The sort is stable, so equidistant attractions keep their catalog order.
/// Fewer than `limit` entries are returned when the catalog is smaller.
///
/// # Examples
/// ```
/// use tourguide_core::test_support::reference_attractions;
/// use tourguide_core::{Position, nearest_attractions};
///
/// let nearest = nearest_attractions(&Position::new(10.0, 10.0), &reference_attractions(), 2);
/// let names: Vec<_> = nearest.iter().map(|poi| poi.name.as_str()).collect();
/// assert_eq!(names, ["Franklin Park Zoo", "Bronx Zoo"]);
/// ```
#[must_use]
pub fn nearest_attractions(
    position: &Position,
    catalog: &[PointOfInterest],
    limit: usize,
) -> Vec<PointOfInterest> {
    let mut ranked: Vec<(f64, &PointOfInterest)> = catalog
        .iter()
        .map(|poi| (distance(*position, poi.position), poi))
        .collect();
    ranked.sort_by(|(lhs, _), (rhs, _)| lhs.total_cmp(rhs));
    ranked
        .into_iter()
        .take(limit)
        .map(|(_, poi)| poi.clone())
        .collect()
}

/// Ranks catalog attractions around a user's position.
pub struct AttractionRanker<C, P> {
    catalog: C,
    points: P,
    limit: usize,
}

impl<C, P> AttractionRanker<C, P>
where
    C: CatalogProvider,
    P: PointsProvider,
{
    /// Construct a ranker returning [`DEFAULT_NEARBY_LIMIT`] attractions.
    pub const fn new(catalog: C, points: P) -> Self {
        Self {
            catalog,
            points,
            limit: DEFAULT_NEARBY_LIMIT,
        }
    }

    /// Construct a ranker returning up to `limit` attractions.
    ///
    /// # Errors
    /// Returns [`RankingError::ZeroLimit`] when `limit` is zero.
    pub fn with_limit(catalog: C, points: P, limit: usize) -> Result<Self, RankingError> {
        if limit == 0 {
            return Err(RankingError::ZeroLimit);
        }
        Ok(Self {
            catalog,
            points,
            limit,
        })
    }

    /// Maximum number of attractions returned.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Rank the attractions closest to `visited`, annotated with the distance
    /// and the points `visited.user_id` would earn.
    ///
    /// # Errors
    /// Returns [`RankingError::EmptyCatalog`] for an empty catalog and
    /// [`RankingError::Provider`] when a provider call fails.
    pub fn rank(&self, visited: &VisitedPosition) -> Result<NearbyAttractions, RankingError> {
        let catalog = self.catalog.points_of_interest()?;
        if catalog.is_empty() {
            return Err(RankingError::EmptyCatalog);
        }
        let attractions = nearest_attractions(&visited.position, &catalog, self.limit)
            .into_iter()
            .map(|poi| {
                let points = self.points.reward_points(poi.id, visited.user_id)?;
                Ok(NearbyAttraction {
                    distance: distance(visited.position, poi.position),
                    name: poi.name,
                    position: poi.position,
                    points,
                })
            })
            .collect::<Result<Vec<_>, RankingError>>()?;
        Ok(NearbyAttractions {
            position: visited.position,
            attractions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixedPointsProvider, MemoryCatalog, reference_attractions};
    use rstest::rstest;
    use std::sync::Arc;
    use uuid::Uuid;

    #[rstest]
    fn ties_keep_catalog_order() {
        let here = Position::new(0.0, 0.0);
        let catalog = vec![
            PointOfInterest::new(Uuid::from_u128(1), "east", Position::new(0.0, 1.0)),
            PointOfInterest::new(Uuid::from_u128(2), "west", Position::new(0.0, -1.0)),
            PointOfInterest::new(Uuid::from_u128(3), "here", here),
        ];
        let names: Vec<_> = nearest_attractions(&here, &catalog, 3)
            .into_iter()
            .map(|poi| poi.name)
            .collect();
        assert_eq!(names, ["here", "east", "west"]);
    }

    #[rstest]
    fn small_catalogs_return_every_entry() {
        let catalog = reference_attractions().into_iter().take(2).collect::<Vec<_>>();
        assert_eq!(nearest_attractions(&Position::new(0.0, 0.0), &catalog, 5).len(), 2);
    }

    #[rstest]
    fn zero_limit_is_rejected() {
        let result = AttractionRanker::with_limit(MemoryCatalog::default(), FixedPointsProvider::new(1), 0);
        assert!(matches!(result, Err(RankingError::ZeroLimit)));
    }

    #[rstest]
    fn every_rank_queries_points_again() {
        let points = FixedPointsProvider::new(3);
        let ranker = AttractionRanker::new(MemoryCatalog::with_pois(reference_attractions()), &points);
        let visited = VisitedPosition::now(Uuid::from_u128(4), Position::new(10.0, 10.0));

        let first = ranker.rank(&visited).expect("ranking succeeds");
        ranker.rank(&visited).expect("ranking succeeds");

        assert_eq!(first.attractions.len(), DEFAULT_NEARBY_LIMIT);
        assert!(first.attractions.iter().all(|attraction| attraction.points == 3));
        assert_eq!(points.lookups(), 2 * DEFAULT_NEARBY_LIMIT);
    }

    #[rstest]
    fn empty_catalog_is_rejected() {
        let ranker = AttractionRanker::new(MemoryCatalog::default(), FixedPointsProvider::new(1));
        let visited = VisitedPosition::now(Uuid::nil(), Position::new(0.0, 0.0));
        assert!(matches!(ranker.rank(&visited), Err(RankingError::EmptyCatalog)));
    }

    /// Boxes a ranker without restating the provider bounds.
    fn boxed<C, P>(ranker: AttractionRanker<C, P>) -> Box<AttractionRanker<C, P>> {
        Box::new(ranker)
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    fn explicit_limits_cap_the_ranking(#[case] limit: usize) {
        let ranker = boxed(
            AttractionRanker::with_limit(
                Arc::new(MemoryCatalog::with_pois(reference_attractions())),
                Arc::new(FixedPointsProvider::new(1)),
                limit,
            )
            .expect("non-zero limit"),
        );
        let visited = VisitedPosition::now(Uuid::nil(), Position::new(10.0, 10.0));

        assert_eq!(ranker.limit(), limit);
        let nearby = ranker.rank(&visited).expect("ranking succeeds");
        assert_eq!(nearby.attractions.len(), limit);
    }
}
