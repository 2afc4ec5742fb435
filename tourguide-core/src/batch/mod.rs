//! Bounded-concurrency fan-out with a join barrier.
//!
//! A [`BatchScheduler`] owns a fixed-size Rayon pool. Each item becomes one
//! unit of work; outcomes flow back over a channel to the calling thread,
//! which blocks until the batch resolves according to its [`FailureMode`].
//!
//! Units are never interrupted. In [`FailureMode::FirstError`] the call
//! returns as soon as a failure is observed and the remaining units finish
//! in the background with their outcomes discarded.

mod error;

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::mpsc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

pub use error::{BatchBuildError, BatchError, UnitFailure};

/// How a batch reacts to failing units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum FailureMode {
    /// Return the first failure observed while collecting outcomes.
    #[default]
    FirstError,
    /// Wait for every unit and report all failures together.
    CollectAll,
}

/// Summary of a batch in which every unit succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BatchReport {
    /// Number of units submitted.
    pub submitted: usize,
    /// Number of units that completed.
    pub completed: usize,
}

enum Outcome<E>
where
    E: std::error::Error + 'static,
{
    Completed,
    Skipped,
    Failed(UnitFailure<E>),
}

/// Runs a worker over many items on a bounded pool.
///
/// # Examples
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use tourguide_core::{BatchScheduler, ProviderError};
///
/// let scheduler = BatchScheduler::new("doc", 4)?;
/// let seen = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&seen);
/// let report = scheduler
///     .run((0..10).collect(), move |_: usize| {
///         counter.fetch_add(1, Ordering::SeqCst);
///         Ok::<(), ProviderError>(())
///     })?;
/// assert_eq!(report.completed, 10);
/// assert_eq!(seen.load(Ordering::SeqCst), 10);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct BatchScheduler {
    name: String,
    pool: rayon::ThreadPool,
    pool_size: usize,
    mode: FailureMode,
}

impl BatchScheduler {
    /// Start a pool of `pool_size` workers named `{name}-{index}`.
    ///
    /// # Errors
    /// Returns [`BatchBuildError::ZeroPoolSize`] when `pool_size` is zero and
    /// [`BatchBuildError::Pool`] when the threads cannot be spawned.
    pub fn new(name: impl Into<String>, pool_size: usize) -> Result<Self, BatchBuildError> {
        if pool_size == 0 {
            return Err(BatchBuildError::ZeroPoolSize);
        }
        let pool_name = name.into();
        let prefix = pool_name.clone();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(pool_size)
            .thread_name(move |index| format!("{prefix}-{index}"))
            .build()?;
        Ok(Self {
            name: pool_name,
            pool,
            pool_size,
            mode: FailureMode::default(),
        })
    }

    /// Return the scheduler with a different failure mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: FailureMode) -> Self {
        self.mode = mode;
        self
    }

    /// Pool name used for thread names and log messages.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of worker threads.
    #[must_use]
    pub const fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Failure mode in effect.
    #[must_use]
    pub const fn mode(&self) -> FailureMode {
        self.mode
    }

    /// Run `worker` once per item and wait for the batch to resolve.
    ///
    /// # Errors
    /// See [`BatchScheduler::run_with_cancellation`].
    pub fn run<T, E, F>(&self, items: Vec<T>, worker: F) -> Result<BatchReport, BatchError<E>>
    where
        T: Send + 'static,
        E: std::error::Error + Send + 'static,
        F: Fn(T) -> Result<(), E> + Send + Sync + 'static,
    {
        self.run_with_cancellation(items, worker, &CancellationToken::new())
    }

    /// Run `worker` once per item, skipping units that have not started by
    /// the time `cancel` fires.
    ///
    /// At most [`pool_size`](Self::pool_size) units execute at once. A unit
    /// that panics is reported as [`UnitFailure::Panicked`].
    ///
    /// # Errors
    /// In [`FailureMode::FirstError`] returns [`BatchError::Unit`] for the
    /// first failure received. In [`FailureMode::CollectAll`] returns
    /// [`BatchError::Failed`] once every unit has finished. When no unit
    /// failed but some were skipped, returns [`BatchError::Cancelled`].
    pub fn run_with_cancellation<T, E, F>(
        &self,
        items: Vec<T>,
        worker: F,
        cancel: &CancellationToken,
    ) -> Result<BatchReport, BatchError<E>>
    where
        T: Send + 'static,
        E: std::error::Error + Send + 'static,
        F: Fn(T) -> Result<(), E> + Send + Sync + 'static,
    {
        let submitted = items.len();
        let worker = Arc::new(worker);
        let (sender, receiver) = mpsc::channel::<Outcome<E>>();

        for (index, item) in items.into_iter().enumerate() {
            let unit_sender = sender.clone();
            let unit_worker = Arc::clone(&worker);
            let unit_cancel = cancel.clone();
            self.pool.spawn(move || {
                let outcome = if unit_cancel.is_cancelled() {
                    Outcome::Skipped
                } else {
                    match catch_unwind(AssertUnwindSafe(|| (*unit_worker)(item))) {
                        Ok(Ok(())) => Outcome::Completed,
                        Ok(Err(source)) => Outcome::Failed(UnitFailure::Error { index, source }),
                        Err(payload) => Outcome::Failed(UnitFailure::Panicked {
                            index,
                            message: panic_message(payload.as_ref()),
                        }),
                    }
                };
                if unit_sender.send(outcome).is_err() {
                    log::trace!("batch unit {index} finished after its batch returned");
                }
            });
        }
        drop(sender);

        let mut completed = 0;
        let mut skipped = 0;
        let mut failures = Vec::new();
        for outcome in receiver {
            match outcome {
                Outcome::Completed => completed += 1,
                Outcome::Skipped => skipped += 1,
                Outcome::Failed(failure) => {
                    log::warn!("{} batch: {failure}", self.name);
                    if self.mode == FailureMode::FirstError {
                        return Err(BatchError::Unit(failure));
                    }
                    failures.push(failure);
                }
            }
        }

        if !failures.is_empty() {
            return Err(BatchError::Failed {
                submitted,
                failures,
            });
        }
        if skipped > 0 {
            log::info!(
                "{} batch cancelled: {completed} of {submitted} unit(s) completed, {skipped} skipped",
                self.name
            );
            return Err(BatchError::Cancelled {
                submitted,
                completed,
            });
        }
        log::info!("{} batch completed {completed} unit(s)", self.name);
        Ok(BatchReport {
            submitted,
            completed,
        })
    }
}

/// Run `worker` over `items` on a fresh pool of `pool_size` threads using
/// [`FailureMode::FirstError`].
///
/// # Errors
/// Returns [`BatchError::Build`] for a zero pool size and otherwise behaves
/// like [`BatchScheduler::run`].
pub fn run_batch<T, E, F>(
    items: Vec<T>,
    worker: F,
    pool_size: usize,
) -> Result<BatchReport, BatchError<E>>
where
    T: Send + 'static,
    E: std::error::Error + Send + 'static,
    F: Fn(T) -> Result<(), E> + Send + Sync + 'static,
{
    BatchScheduler::new("batch", pool_size)?.run(items, worker)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned())
}
