use std::sync::Arc;

use flip_features_sdk::FeatureFlag;
use tracing::{debug, info};

use super::error::DomainError;
use super::repo::FeatureRepository;
use crate::config::StoreConfig;

// ============================================================================
// Service Configuration
// ============================================================================

pub struct ServiceConfig {
    pub max_key_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from(&StoreConfig::default())
    }
}

impl From<&StoreConfig> for ServiceConfig {
    fn from(cfg: &StoreConfig) -> Self {
        Self {
            max_key_length: cfg.max_key_length,
        }
    }
}

// ============================================================================
// Service Implementation
// ============================================================================

pub struct Service<R: FeatureRepository> {
    repo: Arc<R>,
    config: ServiceConfig,
}

impl<R: FeatureRepository> Service<R> {
    #[must_use]
    pub fn new(repo: Arc<R>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    pub async fn status(&self, key: &str) -> Result<Option<bool>, DomainError> {
        Ok(self.get(key).await?.map(|flag| flag.enabled))
    }

    pub async fn is_enabled(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.status(key).await?.unwrap_or(false))
    }

    pub async fn get(&self, key: &str) -> Result<Option<FeatureFlag>, DomainError> {
        self.validate_key(key)?;
        Ok(self.repo.find(key).await?)
    }

    pub async fn list(&self) -> Result<Vec<FeatureFlag>, DomainError> {
        Ok(self.repo.list().await?)
    }

    pub async fn register(&self, key: &str) -> Result<FeatureFlag, DomainError> {
        self.validate_key(key)?;

        if let Some(existing) = self.repo.find(key).await? {
            debug!(key, "Feature flag already registered");
            return Ok(existing);
        }

        let flag = self.repo.insert(key, None).await?;
        info!(key, enabled = flag.enabled, "Registered feature flag");
        Ok(flag)
    }

    pub async fn switch(&self, key: &str, enabled: bool) -> Result<FeatureFlag, DomainError> {
        self.validate_key(key)?;

        let flag = match self.repo.update_enabled(key, enabled).await? {
            Some(flag) => flag,
            None => self.repo.insert(key, Some(enabled)).await?,
        };
        info!(key, enabled, "Switched feature flag");
        Ok(flag)
    }

    fn validate_key(&self, key: &str) -> Result<(), DomainError> {
        if key.trim().is_empty() {
            return Err(DomainError::invalid_key(key, "must not be blank"));
        }
        if key.trim() != key {
            return Err(DomainError::invalid_key(
                key,
                "must not have surrounding whitespace",
            ));
        }
        if key.len() > self.config.max_key_length {
            return Err(DomainError::invalid_key(
                key,
                format!("exceeds maximum length of {}", self.config.max_key_length),
            ));
        }
        Ok(())
    }
}
