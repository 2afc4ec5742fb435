//! Trip pricing requests and the offers they produce.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A priced trip deal returned by a pricing provider.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Offer {
    /// Identifier of the quoted trip.
    pub trip_id: Uuid,
    /// Name of the provider making the offer.
    pub name: String,
    /// Quoted price.
    pub price: f64,
}

impl Offer {
    /// Construct an offer.
    #[must_use]
    pub fn new(trip_id: Uuid, name: impl Into<String>, price: f64) -> Self {
        Self {
            trip_id,
            name: name.into(),
            price,
        }
    }
}

/// Parameters sent to a pricing provider.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuoteRequest {
    /// Credential issued by the pricing service.
    pub api_key: String,
    /// Traveller requesting the quote.
    pub user_id: Uuid,
    /// Number of adults travelling.
    pub adults: u32,
    /// Number of children travelling.
    pub children: u32,
    /// Trip length in days.
    pub trip_duration_days: u32,
    /// Reward points the traveller has accumulated.
    pub cumulative_points: u64,
}
