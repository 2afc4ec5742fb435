//! Facade crate for the tour guide reward and proximity engine.
//!
//! This crate re-exports the core domain types, the reward engine, the
//! nearby attraction ranker and batch scheduler, and the orchestration
//! service that ties them to registered users.

#![forbid(unsafe_code)]

pub use tourguide_core::{
    AttractionRanker, BatchBuildError, BatchError, BatchReport, BatchScheduler, CatalogProvider,
    ContactInfo, DEFAULT_ATTRACTION_PROXIMITY_RANGE_MILES, DEFAULT_NEARBY_LIMIT,
    DEFAULT_PROXIMITY_BUFFER_MILES, DedupPolicy, FailureMode, NearbyAttraction, NearbyAttractions,
    Offer, PointOfInterest, PointsProvider, Position, PricingProvider, ProviderError,
    ProximityConfig, ProximityError, QuoteRequest, RankingError, Reward, RewardEngine,
    RewardError, STATUTE_MILES_PER_NAUTICAL_MILE, UnitFailure, UserPreferences, UserRecord,
    VisitedPosition, distance, nearest_attractions, run_batch,
};

pub use tourguide_service::{
    DEFAULT_PRICING_API_KEY, DEFAULT_REWARDS_POOL_SIZE, DEFAULT_TRACKER_INTERVAL,
    DEFAULT_TRACKING_POOL_SIZE, ServiceConfig, ServiceError, TourGuideService, Tracker,
};
