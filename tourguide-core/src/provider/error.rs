use thiserror::Error;
use uuid::Uuid;

/// Errors reported by provider adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The backing service could not answer.
    #[error("{provider} provider unavailable: {message}")]
    Unavailable {
        /// Which provider failed.
        provider: &'static str,
        /// Description supplied by the adapter.
        message: String,
    },
    /// The provider has no record of the user.
    #[error("{provider} provider has no record of user {user_id}")]
    UnknownUser {
        /// Which provider failed.
        provider: &'static str,
        /// User that was requested.
        user_id: Uuid,
    },
}

impl ProviderError {
    /// Build an [`ProviderError::Unavailable`] error.
    #[must_use]
    pub fn unavailable(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            provider,
            message: message.into(),
        }
    }
}
