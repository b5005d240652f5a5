//! Error types for the feature flags SDK.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatureFlagsError {
    #[error("Invalid feature flag key '{value}': {message}")]
    InvalidKey { value: String, message: String },

    #[error("Feature flag store unavailable")]
    StoreUnavailable,

    #[error("Internal error")]
    Internal,
}

impl FeatureFlagsError {
    #[must_use]
    pub fn invalid_key(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidKey {
            value: value.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn store_unavailable() -> Self {
        Self::StoreUnavailable
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::Internal
    }
}
