use flip_features_sdk::FeatureFlagsError;
use sea_orm::DbErr;
use thiserror::Error;

use crate::errors::is_connectivity_error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid feature flag key '{value}': {message}")]
    InvalidKey { value: String, message: String },

    #[error("feature flag store unavailable: {0}")]
    StoreUnavailable(anyhow::Error),

    #[error("repository error: {0}")]
    Repository(anyhow::Error),
}

impl DomainError {
    #[must_use]
    pub fn invalid_key(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidKey {
            value: value.into(),
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for DomainError {
    fn from(err: anyhow::Error) -> Self {
        if err.downcast_ref::<DbErr>().is_some_and(is_connectivity_error) {
            Self::StoreUnavailable(err)
        } else {
            Self::Repository(err)
        }
    }
}

impl From<DomainError> for FeatureFlagsError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidKey { value, message } => Self::invalid_key(value, message),
            DomainError::StoreUnavailable(e) => {
                tracing::error!(error = %e, "Feature flag store unavailable");
                Self::store_unavailable()
            }
            DomainError::Repository(e) => {
                tracing::error!(error = %e, "Feature flag repository error");
                Self::internal()
            }
        }
    }
}
