use thiserror::Error;

/// Errors raised while building a [`BatchScheduler`](super::BatchScheduler).
#[derive(Debug, Error)]
pub enum BatchBuildError {
    /// A pool needs at least one worker.
    #[error("batch pool size must be at least one")]
    ZeroPoolSize,
    /// Rayon could not start the worker threads.
    #[error("failed to start the batch worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Failure of a single unit of work, identified by its submission index.
#[derive(Debug, Error)]
pub enum UnitFailure<E>
where
    E: std::error::Error + 'static,
{
    /// The worker returned an error.
    #[error("unit {index} failed: {source}")]
    Error {
        /// Position of the item in the submitted batch.
        index: usize,
        /// Error returned by the worker.
        #[source]
        source: E,
    },
    /// The worker panicked.
    #[error("unit {index} panicked: {message}")]
    Panicked {
        /// Position of the item in the submitted batch.
        index: usize,
        /// Panic payload rendered as text.
        message: String,
    },
}

impl<E> UnitFailure<E>
where
    E: std::error::Error + 'static,
{
    /// Submission index of the failed unit.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Error { index, .. } | Self::Panicked { index, .. } => *index,
        }
    }

    /// Worker error, if the unit did not panic.
    #[must_use]
    pub const fn worker_error(&self) -> Option<&E> {
        match self {
            Self::Error { source, .. } => Some(source),
            Self::Panicked { .. } => None,
        }
    }
}

/// Errors returned by [`BatchScheduler::run`](super::BatchScheduler::run).
///
/// Batches are not transactional: units that succeeded keep their effects
/// whichever variant is reported.
#[derive(Debug, Error)]
pub enum BatchError<E>
where
    E: std::error::Error + 'static,
{
    /// The scheduler could not be built.
    #[error(transparent)]
    Build(#[from] BatchBuildError),
    /// The first failure observed; remaining units were left running.
    #[error("batch unit failed: {0}")]
    Unit(#[source] UnitFailure<E>),
    /// Every failure, reported once all units had finished.
    #[error("{} of {submitted} batch units failed", .failures.len())]
    Failed {
        /// Number of units submitted.
        submitted: usize,
        /// Failures in completion order.
        failures: Vec<UnitFailure<E>>,
    },
    /// Cancellation fired before every unit had started.
    #[error("batch cancelled after {completed} of {submitted} units completed")]
    Cancelled {
        /// Number of units submitted.
        submitted: usize,
        /// Units that ran to completion.
        completed: usize,
    },
}

impl<E> BatchError<E>
where
    E: std::error::Error + 'static,
{
    /// All unit failures carried by this error.
    #[must_use]
    pub fn failures(&self) -> &[UnitFailure<E>] {
        match self {
            Self::Unit(failure) => std::slice::from_ref(failure),
            Self::Failed { failures, .. } => failures,
            Self::Build(_) | Self::Cancelled { .. } => &[],
        }
    }
}
