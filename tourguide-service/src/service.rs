//! In-memory orchestration of users, tracking, rewards and trip deals.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio_util::sync::CancellationToken;
use tourguide_core::{
    AttractionRanker, BatchReport, BatchScheduler, CatalogProvider, NearbyAttractions, Offer,
    PointsProvider, PricingProvider, ProximityConfig, QuoteRequest, Reward, RewardEngine,
    UserRecord, VisitedPosition,
};

use crate::{ServiceConfig, ServiceError, Tracker};

const TRACKING_POOL: &str = "tracking";
const REWARDS_POOL: &str = "rewards";

/// Coordinates position tracking, reward calculation, ranking and pricing
/// for the users held in its keyed store.
///
/// Cloning is cheap and every clone shares the same store, pools and
/// proximity settings.
///
/// # Examples
/// ```
/// use tourguide_core::test_support::{
///     FixedPointsProvider, MemoryCatalog, StaticPricingProvider, reference_attractions,
/// };
/// use tourguide_core::{ContactInfo, UserRecord};
/// use tourguide_service::{ServiceConfig, TourGuideService};
/// use uuid::Uuid;
///
/// let attractions = reference_attractions();
/// let fallingwater = attractions[11].position;
/// let user_id = Uuid::new_v4();
/// let service = TourGuideService::new(
///     MemoryCatalog::with_pois(attractions).with_user_position(user_id, fallingwater),
///     FixedPointsProvider::new(50),
///     StaticPricingProvider::default(),
///     ServiceConfig::default(),
/// )?;
///
/// service.add_user(UserRecord::new(user_id, "jon", ContactInfo::default()));
/// let user = service.user("jon").expect("registered");
/// let visited = service.track_position(&user)?;
/// assert_eq!(visited.user_id, user_id);
/// assert_eq!(service.user_rewards(&user).len(), 1);
/// # Ok::<(), tourguide_service::ServiceError>(())
/// ```
pub struct TourGuideService<C, P, Q> {
    inner: Arc<Inner<C, P, Q>>,
}

struct Inner<C, P, Q> {
    catalog: Arc<C>,
    pricing: Q,
    engine: RewardEngine<Arc<C>, Arc<P>>,
    ranker: AttractionRanker<Arc<C>, Arc<P>>,
    users: RwLock<BTreeMap<String, Arc<UserRecord>>>,
    proximity: RwLock<ProximityConfig>,
    tracking: BatchScheduler,
    rewards: BatchScheduler,
    config: ServiceConfig,
}

impl<C, P, Q> Clone for TourGuideService<C, P, Q> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, P, Q> TourGuideService<C, P, Q>
where
    C: CatalogProvider + 'static,
    P: PointsProvider + 'static,
    Q: PricingProvider + 'static,
{
    /// Build a service around the three providers.
    ///
    /// # Errors
    /// Returns [`ServiceError::Proximity`] for invalid thresholds and
    /// [`ServiceError::Pool`] when a worker pool cannot be started.
    pub fn new(
        catalog: C,
        points: P,
        pricing: Q,
        config: ServiceConfig,
    ) -> Result<Self, ServiceError> {
        let proximity = config.proximity()?;
        let tracking = BatchScheduler::new(TRACKING_POOL, config.tracking_pool_size)
            .map_err(|source| ServiceError::Pool {
                pool: TRACKING_POOL,
                source,
            })?
            .with_mode(config.failure_mode);
        let rewards = BatchScheduler::new(REWARDS_POOL, config.rewards_pool_size)
            .map_err(|source| ServiceError::Pool {
                pool: REWARDS_POOL,
                source,
            })?
            .with_mode(config.failure_mode);

        let shared_catalog = Arc::new(catalog);
        let shared_points = Arc::new(points);
        Ok(Self {
            inner: Arc::new(Inner {
                engine: RewardEngine::with_dedup(
                    Arc::clone(&shared_catalog),
                    Arc::clone(&shared_points),
                    config.dedup,
                ),
                ranker: AttractionRanker::new(Arc::clone(&shared_catalog), shared_points),
                catalog: shared_catalog,
                pricing,
                users: RwLock::new(BTreeMap::new()),
                proximity: RwLock::new(proximity),
                tracking,
                rewards,
                config,
            }),
        })
    }

    /// Settings the service was built with.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.inner.config
    }

    /// Register `user` unless a user with the same name already exists.
    ///
    /// Returns `true` when the user was added.
    pub fn add_user(&self, user: UserRecord) -> bool {
        let mut users = write(&self.inner.users);
        if users.contains_key(user.name()) {
            log::debug!("user {} is already registered", user.name());
            return false;
        }
        users.insert(user.name().to_owned(), Arc::new(user));
        true
    }

    /// Look a user up by name.
    #[must_use]
    pub fn user(&self, name: &str) -> Option<Arc<UserRecord>> {
        read(&self.inner.users).get(name).cloned()
    }

    /// Every registered user, ordered by name.
    #[must_use]
    pub fn users(&self) -> Vec<Arc<UserRecord>> {
        read(&self.inner.users).values().cloned().collect()
    }

    /// The proximity thresholds the next operation will use.
    #[must_use]
    pub fn proximity(&self) -> ProximityConfig {
        *read(&self.inner.proximity)
    }

    /// Change the reward eligibility threshold for subsequent operations.
    ///
    /// Operations already running keep the threshold they started with.
    ///
    /// # Errors
    /// Returns [`ServiceError::Proximity`] for negative or non-finite values.
    pub fn set_proximity_buffer(&self, miles: f64) -> Result<(), ServiceError> {
        let mut proximity = write(&self.inner.proximity);
        *proximity = proximity.with_proximity_buffer(miles)?;
        Ok(())
    }

    /// Restore the default reward eligibility threshold.
    pub fn reset_proximity_buffer(&self) {
        let mut proximity = write(&self.inner.proximity);
        *proximity = proximity.with_default_proximity_buffer();
    }

    /// Fetch the user's current position, append it to their history and
    /// recalculate their rewards.
    ///
    /// # Errors
    /// Returns [`ServiceError::Provider`] when the position cannot be fetched
    /// and [`ServiceError::Reward`] when the calculation fails. A failed
    /// calculation leaves the new position in the history.
    pub fn track_position(&self, user: &UserRecord) -> Result<VisitedPosition, ServiceError> {
        self.inner.track(user, &self.proximity())
    }

    /// Track every user in `users` on the tracking pool.
    ///
    /// # Errors
    /// Returns [`ServiceError::Batch`] when a unit fails; see
    /// [`BatchScheduler::run`] for how failures are reported.
    pub fn track_positions_batch(
        &self,
        users: &[Arc<UserRecord>],
    ) -> Result<BatchReport, ServiceError> {
        self.track_positions_batch_with_cancellation(users, &CancellationToken::new())
    }

    /// Track every user in `users`, skipping users not yet started when
    /// `cancel` fires.
    ///
    /// # Errors
    /// As [`TourGuideService::track_positions_batch`], plus a cancelled
    /// batch error when `cancel` fires.
    pub fn track_positions_batch_with_cancellation(
        &self,
        users: &[Arc<UserRecord>],
        cancel: &CancellationToken,
    ) -> Result<BatchReport, ServiceError> {
        let proximity = self.proximity();
        let inner = Arc::clone(&self.inner);
        self.inner
            .tracking
            .run_with_cancellation(
                users.to_vec(),
                move |user: Arc<UserRecord>| inner.track(&user, &proximity).map(|_| ()),
                cancel,
            )
            .map_err(|err| ServiceError::batch("track positions", err))
    }

    /// Calculate rewards for one user with the current proximity settings.
    ///
    /// # Errors
    /// Returns [`ServiceError::Reward`] when the calculation fails.
    pub fn calculate_rewards(&self, user: &UserRecord) -> Result<Vec<Reward>, ServiceError> {
        Ok(self.inner.engine.calculate_rewards(user, &self.proximity())?)
    }

    /// Calculate rewards for every user in `users` on the rewards pool.
    ///
    /// Every unit sees the proximity settings in effect when the batch
    /// started. Units that succeed keep their rewards even when the batch
    /// reports a failure.
    ///
    /// # Errors
    /// Returns [`ServiceError::Batch`] when a unit fails.
    pub fn calculate_rewards_batch(
        &self,
        users: &[Arc<UserRecord>],
    ) -> Result<BatchReport, ServiceError> {
        let proximity = self.proximity();
        let inner = Arc::clone(&self.inner);
        self.inner
            .rewards
            .run(users.to_vec(), move |user: Arc<UserRecord>| {
                inner
                    .engine
                    .calculate_rewards(&user, &proximity)
                    .map(|_| ())
                    .map_err(ServiceError::from)
            })
            .map_err(|err| ServiceError::batch("calculate rewards", err))
    }

    /// The closest attractions to `visited`, with the points its user would
    /// earn at each.
    ///
    /// # Errors
    /// Returns [`ServiceError::Ranking`] when ranking fails.
    pub fn nearby_attractions(
        &self,
        visited: &VisitedPosition,
    ) -> Result<NearbyAttractions, ServiceError> {
        Ok(self.inner.ranker.rank(visited)?)
    }

    /// The user's most recent position, tracking them first when their
    /// history is empty.
    ///
    /// # Errors
    /// Propagates [`TourGuideService::track_position`] failures.
    pub fn user_location(&self, user: &UserRecord) -> Result<VisitedPosition, ServiceError> {
        match user.latest_position() {
            Some(visited) => Ok(visited),
            None => self.track_position(user),
        }
    }

    /// Rewards the user has been granted.
    #[must_use]
    pub fn user_rewards(&self, user: &UserRecord) -> Vec<Reward> {
        user.rewards()
    }

    /// Request trip offers priced against the user's accumulated points and
    /// cache them on the user.
    ///
    /// # Errors
    /// Returns [`ServiceError::Provider`] when pricing fails; the cached
    /// offers are left unchanged.
    pub fn trip_deals(&self, user: &UserRecord) -> Result<Vec<Offer>, ServiceError> {
        let preferences = user.preferences();
        let request = QuoteRequest {
            api_key: self.inner.config.pricing_api_key.clone(),
            user_id: user.id(),
            adults: preferences.adults,
            children: preferences.children,
            trip_duration_days: preferences.trip_duration_days,
            cumulative_points: user.cumulative_points(),
        };
        let offers = self.inner.pricing.quote(&request)?;
        user.set_last_offers(offers.clone());
        Ok(offers)
    }

    /// Start a background tracker over every registered user at the
    /// configured interval.
    ///
    /// # Errors
    /// Returns [`ServiceError::TrackerSpawn`] when the thread cannot start.
    pub fn start_tracker(&self) -> Result<Tracker, ServiceError> {
        Tracker::start(self.clone(), self.inner.config.tracker_interval)
    }
}

impl<C, P, Q> Inner<C, P, Q>
where
    C: CatalogProvider,
    P: PointsProvider,
    Q: PricingProvider,
{
    fn track(
        &self,
        user: &UserRecord,
        proximity: &ProximityConfig,
    ) -> Result<VisitedPosition, ServiceError> {
        let visited = self.catalog.last_known_position(user.id())?;
        user.record_position(visited.clone());
        self.engine.calculate_rewards(user, proximity)?;
        Ok(visited)
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
