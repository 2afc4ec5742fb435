//! Contracts for the external services the engine consumes.
//!
//! The catalog provider supplies the attraction catalog and a user's current
//! position, the points provider prices a visit, and the pricing provider
//! turns accumulated points into trip offers. Calls are synchronous and may
//! block; implementations own any retry policy.

mod error;
mod traits;

pub use error::ProviderError;
pub use traits::{CatalogProvider, PointsProvider, PricingProvider};
