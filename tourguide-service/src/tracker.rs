//! Background thread that periodically tracks every registered user.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tourguide_core::{CatalogProvider, PointsProvider, PricingProvider};

use crate::{ServiceError, TourGuideService};

/// Handle to a running tracker thread.
///
/// Each pass runs `track_positions_batch` over every registered user, then
/// sleeps for the configured interval. Stopping wakes the thread, skips users
/// not yet tracked in the current pass and joins it. Dropping the handle
/// stops the tracker too.
#[derive(Debug)]
pub struct Tracker {
    wake: Option<Sender<()>>,
    cancel: CancellationToken,
    passes: Arc<AtomicUsize>,
    handle: Option<JoinHandle<()>>,
}

impl Tracker {
    /// Spawn a tracker over `service` pausing `interval` between passes.
    ///
    /// # Errors
    /// Returns [`ServiceError::TrackerSpawn`] when the thread cannot start.
    pub fn start<C, P, Q>(
        service: TourGuideService<C, P, Q>,
        interval: Duration,
    ) -> Result<Self, ServiceError>
    where
        C: CatalogProvider + 'static,
        P: PointsProvider + 'static,
        Q: PricingProvider + 'static,
    {
        let (wake, sleeper) = mpsc::channel();
        let cancel = CancellationToken::new();
        let passes = Arc::new(AtomicUsize::new(0));
        let worker_cancel = cancel.clone();
        let worker_passes = Arc::clone(&passes);
        let handle = thread::Builder::new()
            .name("tourguide-tracker".to_owned())
            .spawn(move || {
                loop {
                    run_pass(&service, &worker_cancel);
                    worker_passes.fetch_add(1, Ordering::SeqCst);
                    match sleeper.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                log::debug!("tracker stopped");
            })
            .map_err(ServiceError::TrackerSpawn)?;
        Ok(Self {
            wake: Some(wake),
            cancel,
            passes,
            handle: Some(handle),
        })
    }

    /// Number of passes completed so far.
    #[must_use]
    pub fn completed_passes(&self) -> usize {
        self.passes.load(Ordering::SeqCst)
    }

    /// Stop the tracker and wait for its thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Some(wake) = self.wake.take()
            && wake.send(()).is_err()
        {
            log::trace!("tracker thread already exited");
        }
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            log::warn!("tracker thread panicked");
        }
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_pass<C, P, Q>(service: &TourGuideService<C, P, Q>, cancel: &CancellationToken)
where
    C: CatalogProvider + 'static,
    P: PointsProvider + 'static,
    Q: PricingProvider + 'static,
{
    let users = service.users();
    let started = Instant::now();
    match service.track_positions_batch_with_cancellation(&users, cancel) {
        Ok(report) => log::info!(
            "tracked {} user(s) in {:?}",
            report.completed,
            started.elapsed()
        ),
        Err(err) => log::warn!("tracking pass failed: {err}"),
    }
}
