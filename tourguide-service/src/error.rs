use thiserror::Error;
use tourguide_core::{
    BatchBuildError, BatchError, ProviderError, ProximityError, RankingError, RewardError,
};

/// Errors returned by [`TourGuideService`](crate::TourGuideService) and
/// [`Tracker`](crate::Tracker).
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// Reward calculation failed.
    #[error(transparent)]
    Reward(#[from] RewardError),
    /// Ranking nearby attractions failed.
    #[error(transparent)]
    Ranking(#[from] RankingError),
    /// A proximity threshold was rejected.
    #[error(transparent)]
    Proximity(#[from] ProximityError),
    /// A worker pool could not be started.
    #[error("failed to start the {pool} pool: {source}")]
    Pool {
        /// Which pool failed.
        pool: &'static str,
        /// Underlying build error.
        #[source]
        source: BatchBuildError,
    },
    /// A bulk operation did not complete cleanly.
    #[error("{operation} batch failed: {source}")]
    Batch {
        /// Which bulk operation failed.
        operation: &'static str,
        /// Batch outcome.
        #[source]
        source: Box<BatchError<ServiceError>>,
    },
    /// The tracker thread could not be spawned.
    #[error("failed to spawn the tracker thread: {0}")]
    TrackerSpawn(#[source] std::io::Error),
}

impl ServiceError {
    pub(crate) fn batch(operation: &'static str, source: BatchError<Self>) -> Self {
        Self::Batch {
            operation,
            source: Box::new(source),
        }
    }
}
