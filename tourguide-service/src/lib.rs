//! Orchestration layer for the tour guide engine.
//!
//! [`TourGuideService`] keeps registered users in memory and drives the core
//! engine: it tracks positions, calculates rewards one user at a time or in
//! bulk on bounded pools, ranks nearby attractions and requests trip deals.
//! [`Tracker`] repeats bulk tracking in the background.

#![forbid(unsafe_code)]

mod config;
mod error;
mod service;
mod tracker;

pub use config::{
    DEFAULT_PRICING_API_KEY, DEFAULT_REWARDS_POOL_SIZE, DEFAULT_TRACKER_INTERVAL,
    DEFAULT_TRACKING_POOL_SIZE, ServiceConfig,
};
pub use error::ServiceError;
pub use service::TourGuideService;
pub use tracker::Tracker;
