//! Provider traits and their forwarding implementations for shared and
//! borrowed handles.

use std::sync::Arc;

use uuid::Uuid;

use crate::{Offer, PointOfInterest, QuoteRequest, VisitedPosition};

use super::error::ProviderError;

/// Source of the attraction catalog and of users' current positions.
///
/// # Examples
///
/// ```rust
/// use tourguide_core::{
///     CatalogProvider, PointOfInterest, Position, ProviderError, VisitedPosition,
/// };
/// use uuid::Uuid;
///
/// struct SingleAttraction;
///
/// impl CatalogProvider for SingleAttraction {
///     fn points_of_interest(&self) -> Result<Vec<PointOfInterest>, ProviderError> {
///         Ok(vec![PointOfInterest::new(Uuid::nil(), "Fallingwater", Position::new(39.9, -79.5))])
///     }
///
///     fn last_known_position(&self, user_id: Uuid) -> Result<VisitedPosition, ProviderError> {
///         Ok(VisitedPosition::now(user_id, Position::new(0.0, 0.0)))
///     }
/// }
///
/// let catalog = SingleAttraction.points_of_interest()?;
/// assert_eq!(catalog.len(), 1);
/// # Ok::<(), ProviderError>(())
/// ```
pub trait CatalogProvider: Send + Sync {
    /// Return the full attraction catalog.
    ///
    /// Callers treat the result as a snapshot for the duration of one
    /// operation.
    fn points_of_interest(&self) -> Result<Vec<PointOfInterest>, ProviderError>;

    /// Return the user's current position fix.
    fn last_known_position(&self, user_id: Uuid) -> Result<VisitedPosition, ProviderError>;
}

/// Prices a visit of one attraction by one user.
///
/// Lookups are expected to be deterministic for a fixed pair but may be slow.
pub trait PointsProvider: Send + Sync {
    /// Return the points awarded to `user_id` for visiting `poi_id`.
    fn reward_points(&self, poi_id: Uuid, user_id: Uuid) -> Result<u32, ProviderError>;
}

/// Converts accumulated points and trip preferences into offers.
pub trait PricingProvider: Send + Sync {
    /// Return the offers available for `request`.
    fn quote(&self, request: &QuoteRequest) -> Result<Vec<Offer>, ProviderError>;
}

impl<T: CatalogProvider + ?Sized> CatalogProvider for Arc<T> {
    fn points_of_interest(&self) -> Result<Vec<PointOfInterest>, ProviderError> {
        (**self).points_of_interest()
    }

    fn last_known_position(&self, user_id: Uuid) -> Result<VisitedPosition, ProviderError> {
        (**self).last_known_position(user_id)
    }
}

impl<T: PointsProvider + ?Sized> PointsProvider for Arc<T> {
    fn reward_points(&self, poi_id: Uuid, user_id: Uuid) -> Result<u32, ProviderError> {
        (**self).reward_points(poi_id, user_id)
    }
}

impl<T: PricingProvider + ?Sized> PricingProvider for Arc<T> {
    fn quote(&self, request: &QuoteRequest) -> Result<Vec<Offer>, ProviderError> {
        (**self).quote(request)
    }
}

impl<T: CatalogProvider + ?Sized> CatalogProvider for &T {
    fn points_of_interest(&self) -> Result<Vec<PointOfInterest>, ProviderError> {
        (**self).points_of_interest()
    }

    fn last_known_position(&self, user_id: Uuid) -> Result<VisitedPosition, ProviderError> {
        (**self).last_known_position(user_id)
    }
}

impl<T: PointsProvider + ?Sized> PointsProvider for &T {
    fn reward_points(&self, poi_id: Uuid, user_id: Uuid) -> Result<u32, ProviderError> {
        (**self).reward_points(poi_id, user_id)
    }
}
