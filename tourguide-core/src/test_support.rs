//! In-memory provider implementations and reference data used by unit and
//! behaviour tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use uuid::Uuid;

use crate::{
    CatalogProvider, Offer, PointOfInterest, PointsProvider, Position, PricingProvider,
    ProviderError, QuoteRequest, VisitedPosition,
};

const REFERENCE_CATALOG: [(&str, f64, f64); 26] = [
    ("Disneyland", 33.817_595, -117.922_008),
    ("Jackson Hole", 43.582_767, -110.821_999),
    ("Mojave National Preserve", 35.141_689, -115.510_399),
    ("Joshua Tree National Park", 33.881_866, -115.900_65),
    ("Buffalo National River", 35.985_512, -92.757_652),
    ("Hot Springs National Park", 34.521_53, -93.042_267),
    ("Kartchner Caverns State Park", 31.837_551, -110.347_382),
    ("Legend Valley", 39.937_778, -82.406_67),
    ("Flowers Bakery of London", 37.131_527, -84.074_86),
    ("McKinley Tower", 61.218_887, -149.877_502),
    ("Flatiron Building", 40.741_112, -73.989_723),
    ("Fallingwater", 39.906_113, -79.468_056),
    ("Union Station", 38.897_095, -77.006_332),
    ("Roger Dean Stadium", 26.890_959, -80.116_577),
    ("Texas Memorial Stadium", 30.283_682, -97.732_536),
    ("Bryant-Denny Stadium", 33.208_973, -87.550_438),
    ("Tiger Stadium", 30.412_035, -91.183_815),
    ("Neyland Stadium", 35.955_013, -83.925_011),
    ("Kyle Field", 30.610_25, -96.339_844),
    ("San Diego Zoo", 32.735_317, -117.149_048),
    ("Zoo Tampa at Lowry Park", 28.012_804, -82.469_269),
    ("Franklin Park Zoo", 42.302_601, -71.086_731),
    ("El Paso Zoo", 31.769_125, -106.444_87),
    ("Kansas City Zoo", 39.007_504, -94.529_625),
    ("Bronx Zoo", 40.852_905, -73.872_971),
    ("Cinderella Castle", 28.419_411, -81.581_2),
];

/// The 26-attraction reference catalog used throughout the tests.
///
/// Identifiers are `Uuid::from_u128(1)` through `Uuid::from_u128(26)` in
/// catalog order.
#[must_use]
pub fn reference_attractions() -> Vec<PointOfInterest> {
    (1_u128..)
        .zip(REFERENCE_CATALOG)
        .map(|(id, (name, latitude, longitude))| {
            PointOfInterest::new(Uuid::from_u128(id), name, Position::new(latitude, longitude))
        })
        .collect()
}

/// In-memory `CatalogProvider`.
///
/// Users without an explicit position are reported at the default position,
/// the origin unless overridden.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    pois: Vec<PointOfInterest>,
    positions: HashMap<Uuid, Position>,
    default_position: Position,
    position_requests: AtomicUsize,
}

impl MemoryCatalog {
    /// Create a catalog serving `pois`.
    #[must_use]
    pub fn with_pois<I>(pois: I) -> Self
    where
        I: IntoIterator<Item = PointOfInterest>,
    {
        Self {
            pois: pois.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Report `position` for `user_id`.
    #[must_use]
    pub fn with_user_position(mut self, user_id: Uuid, position: Position) -> Self {
        self.positions.insert(user_id, position);
        self
    }

    /// Report `position` for every user without an explicit position.
    #[must_use]
    pub const fn with_default_position(mut self, position: Position) -> Self {
        self.default_position = position;
        self
    }

    /// Number of `last_known_position` calls served so far.
    #[must_use]
    pub fn position_requests(&self) -> usize {
        self.position_requests.load(Ordering::SeqCst)
    }
}

impl CatalogProvider for MemoryCatalog {
    fn points_of_interest(&self) -> Result<Vec<PointOfInterest>, ProviderError> {
        Ok(self.pois.clone())
    }

    fn last_known_position(&self, user_id: Uuid) -> Result<VisitedPosition, ProviderError> {
        self.position_requests.fetch_add(1, Ordering::SeqCst);
        let position = self
            .positions
            .get(&user_id)
            .copied()
            .unwrap_or(self.default_position);
        Ok(VisitedPosition::now(user_id, position))
    }
}

/// `PointsProvider` awarding the same number of points for every visit.
///
/// Lookups for a user marked as failing return
/// [`ProviderError::Unavailable`] once that user's allowance of successful
/// lookups is spent.
#[derive(Debug, Default)]
pub struct FixedPointsProvider {
    points: u32,
    failing: HashMap<Uuid, usize>,
    lookups: AtomicUsize,
    per_user: Mutex<HashMap<Uuid, usize>>,
}

impl FixedPointsProvider {
    /// Award `points` for every visit.
    #[must_use]
    pub fn new(points: u32) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    /// Fail every lookup for `user_id`.
    #[must_use]
    pub fn failing_for(self, user_id: Uuid) -> Self {
        self.failing_after(user_id, 0)
    }

    /// Fail lookups for `user_id` after `successes` have been served.
    #[must_use]
    pub fn failing_after(mut self, user_id: Uuid, successes: usize) -> Self {
        self.failing.insert(user_id, successes);
        self
    }

    /// Number of lookups attempted so far, failed ones included.
    #[must_use]
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl PointsProvider for FixedPointsProvider {
    fn reward_points(&self, poi_id: Uuid, user_id: Uuid) -> Result<u32, ProviderError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let Some(&allowance) = self.failing.get(&user_id) else {
            return Ok(self.points);
        };
        let mut served = self.per_user.lock().unwrap_or_else(PoisonError::into_inner);
        let count = served.entry(user_id).or_insert(0);
        if *count >= allowance {
            return Err(ProviderError::unavailable(
                "points",
                format!("lookup of {poi_id} for user {user_id} refused"),
            ));
        }
        *count += 1;
        Ok(self.points)
    }
}

/// `PricingProvider` returning a fixed list of offers.
#[derive(Debug, Default)]
pub struct StaticPricingProvider {
    offers: Vec<Offer>,
    last_request: Mutex<Option<QuoteRequest>>,
}

impl StaticPricingProvider {
    /// Quote `offers` for every request.
    #[must_use]
    pub const fn new(offers: Vec<Offer>) -> Self {
        Self {
            offers,
            last_request: Mutex::new(None),
        }
    }

    /// The most recent request received.
    #[must_use]
    pub fn last_request(&self) -> Option<QuoteRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PricingProvider for StaticPricingProvider {
    fn quote(&self, request: &QuoteRequest) -> Result<Vec<Offer>, ProviderError> {
        *self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(request.clone());
        Ok(self.offers.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn reference_catalog_has_sequential_ids() {
        let pois = reference_attractions();
        assert_eq!(pois.len(), 26);
        assert_eq!(pois.first().map(|poi| poi.id), Some(Uuid::from_u128(1)));
        assert_eq!(pois.last().map(|poi| poi.id), Some(Uuid::from_u128(26)));
    }

    #[rstest]
    fn failing_after_serves_the_allowance_first() {
        let user = Uuid::from_u128(3);
        let points = FixedPointsProvider::new(5).failing_after(user, 1);
        assert_eq!(points.reward_points(Uuid::nil(), user), Ok(5));
        assert!(points.reward_points(Uuid::nil(), user).is_err());
        assert_eq!(points.reward_points(Uuid::nil(), Uuid::nil()), Ok(5));
        assert_eq!(points.lookups(), 3);
    }

    #[rstest]
    fn catalog_reports_configured_positions() {
        let user = Uuid::from_u128(8);
        let catalog = MemoryCatalog::default()
            .with_user_position(user, Position::new(1.0, 2.0))
            .with_default_position(Position::new(3.0, 4.0));
        let known = catalog.last_known_position(user).expect("position");
        let other = catalog.last_known_position(Uuid::nil()).expect("position");
        assert_eq!(known.position, Position::new(1.0, 2.0));
        assert_eq!(other.position, Position::new(3.0, 4.0));
        assert_eq!(catalog.position_requests(), 2);
    }
}
