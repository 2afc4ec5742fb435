//! Core domain for the tour guide reward and proximity engine.
//!
//! The crate computes great-circle distances, decides when a position counts
//! as a visit, grants each user at most one reward per attraction, ranks the
//! attractions nearest a position and fans work out across bounded worker
//! pools. External services are reached through the traits in
//! [`provider`]; the crate performs no I/O of its own.

#![forbid(unsafe_code)]

mod batch;
mod engine;
mod poi;
mod position;
pub mod provider;
mod proximity;
mod ranking;
mod reward;
mod trip;
mod user;

pub mod test_support;

pub use batch::{
    BatchBuildError, BatchError, BatchReport, BatchScheduler, FailureMode, UnitFailure, run_batch,
};
pub use engine::{RewardEngine, RewardError};
pub use poi::PointOfInterest;
pub use position::{Position, STATUTE_MILES_PER_NAUTICAL_MILE, VisitedPosition, distance};
pub use provider::{CatalogProvider, PointsProvider, PricingProvider, ProviderError};
pub use proximity::{
    DEFAULT_ATTRACTION_PROXIMITY_RANGE_MILES, DEFAULT_PROXIMITY_BUFFER_MILES, ProximityConfig,
    ProximityError,
};
pub use ranking::{
    AttractionRanker, DEFAULT_NEARBY_LIMIT, NearbyAttraction, NearbyAttractions, RankingError,
    nearest_attractions,
};
pub use reward::{DedupPolicy, Reward};
pub use trip::{Offer, QuoteRequest};
pub use user::{ContactInfo, UserPreferences, UserRecord};
