//! Per-user ledger of visited positions, rewards and cached offers.
//!
//! A [`UserRecord`] is shared between worker threads as `Arc<UserRecord>`.
//! Each mutable collection sits behind its own lock; readers receive owned
//! snapshots so no caller ever iterates a collection another thread is
//! growing.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DedupPolicy, Offer, Reward, VisitedPosition};

/// How to reach a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactInfo {
    /// Phone number.
    pub phone: String,
    /// Email address.
    pub email: String,
}

impl ContactInfo {
    /// Construct contact details.
    #[must_use]
    pub fn new(phone: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            email: email.into(),
        }
    }
}

/// Trip preferences forwarded to the pricing provider.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UserPreferences {
    /// How far the user is willing to travel to an attraction, in miles.
    /// `None` means unbounded.
    pub attraction_proximity_miles: Option<f64>,
    /// Trip length in days.
    pub trip_duration_days: u32,
    /// Tickets required per booking.
    pub ticket_quantity: u32,
    /// Number of adults travelling.
    pub adults: u32,
    /// Number of children travelling.
    pub children: u32,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            attraction_proximity_miles: None,
            trip_duration_days: 1,
            ticket_quantity: 1,
            adults: 1,
            children: 0,
        }
    }
}

/// A registered user and their reward ledger.
///
/// # Examples
/// ```
/// use tourguide_core::{ContactInfo, Position, UserRecord, VisitedPosition};
/// use uuid::Uuid;
///
/// let user = UserRecord::new(Uuid::new_v4(), "jon", ContactInfo::new("000", "jon@tourGuide.com"));
/// user.record_position(VisitedPosition::now(user.id(), Position::new(0.0, 0.0)));
/// assert_eq!(user.history_len(), 1);
/// assert!(user.rewards().is_empty());
/// ```
#[derive(Debug)]
pub struct UserRecord {
    id: Uuid,
    name: String,
    contact: ContactInfo,
    preferences: RwLock<UserPreferences>,
    history: RwLock<Vec<VisitedPosition>>,
    rewards: RwLock<Vec<Reward>>,
    last_offers: RwLock<Vec<Offer>>,
}

impl UserRecord {
    /// Create a user with an empty history and default preferences.
    #[must_use]
    pub fn new(id: Uuid, name: impl Into<String>, contact: ContactInfo) -> Self {
        Self {
            id,
            name: name.into(),
            contact,
            preferences: RwLock::new(UserPreferences::default()),
            history: RwLock::new(Vec::new()),
            rewards: RwLock::new(Vec::new()),
            last_offers: RwLock::new(Vec::new()),
        }
    }

    /// Stable user identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Unique user name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contact details.
    #[must_use]
    pub const fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    /// Current trip preferences.
    #[must_use]
    pub fn preferences(&self) -> UserPreferences {
        read(&self.preferences).clone()
    }

    /// Replace the trip preferences.
    pub fn set_preferences(&self, preferences: UserPreferences) {
        *write(&self.preferences) = preferences;
    }

    /// Snapshot of the position history in chronological order.
    #[must_use]
    pub fn history(&self) -> Vec<VisitedPosition> {
        read(&self.history).clone()
    }

    /// Number of recorded positions.
    #[must_use]
    pub fn history_len(&self) -> usize {
        read(&self.history).len()
    }

    /// Most recent recorded position, if any.
    #[must_use]
    pub fn latest_position(&self) -> Option<VisitedPosition> {
        read(&self.history).last().cloned()
    }

    /// Append a position fix to the history.
    pub fn record_position(&self, visited: VisitedPosition) {
        write(&self.history).push(visited);
    }

    /// Snapshot of the awarded rewards.
    #[must_use]
    pub fn rewards(&self) -> Vec<Reward> {
        read(&self.rewards).clone()
    }

    /// Sum of all awarded points.
    #[must_use]
    pub fn cumulative_points(&self) -> u64 {
        read(&self.rewards)
            .iter()
            .map(|reward| u64::from(reward.points))
            .sum()
    }

    /// Offers returned by the most recent pricing request.
    #[must_use]
    pub fn last_offers(&self) -> Vec<Offer> {
        read(&self.last_offers).clone()
    }

    /// Cache the offers returned by a pricing request.
    pub fn set_last_offers(&self, offers: Vec<Offer>) {
        *write(&self.last_offers) = offers;
    }

    /// Append `candidates` in a single write, skipping any attraction that
    /// is already covered under `policy`.
    ///
    /// Concurrent calculations for the same user may both derive a reward
    /// for the same attraction; the re-check under the write lock keeps at
    /// most one. Returns the rewards that were stored.
    pub(crate) fn commit_rewards(&self, candidates: Vec<Reward>, policy: DedupPolicy) -> Vec<Reward> {
        if candidates.is_empty() {
            return candidates;
        }
        let mut rewards = write(&self.rewards);
        let mut committed = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let poi = &candidate.point_of_interest;
            if rewards.iter().any(|existing| policy.covers(existing, poi)) {
                log::debug!(
                    "user {} already holds a reward for {}; dropping duplicate",
                    self.id,
                    poi.name
                );
                continue;
            }
            rewards.push(candidate.clone());
            committed.push(candidate);
        }
        committed
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
