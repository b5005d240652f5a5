use std::sync::Arc;

use async_trait::async_trait;
use flip_features_sdk::{FeatureFlag, FeatureFlagsApi, FeatureFlagsError};

use crate::domain::repo::FeatureRepository;
use crate::domain::service::Service;

/// In-process [`FeatureFlagsApi`] backed by the domain service.
pub struct LocalClient<R: FeatureRepository + 'static> {
    service: Arc<Service<R>>,
}

impl<R: FeatureRepository + 'static> LocalClient<R> {
    #[must_use]
    pub fn new(service: Arc<Service<R>>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<R: FeatureRepository + 'static> FeatureFlagsApi for LocalClient<R> {
    async fn status(&self, key: &str) -> Result<Option<bool>, FeatureFlagsError> {
        self.service.status(key).await.map_err(Into::into)
    }

    async fn is_enabled(&self, key: &str) -> Result<bool, FeatureFlagsError> {
        self.service.is_enabled(key).await.map_err(Into::into)
    }

    async fn get(&self, key: &str) -> Result<Option<FeatureFlag>, FeatureFlagsError> {
        self.service.get(key).await.map_err(Into::into)
    }

    async fn list(&self) -> Result<Vec<FeatureFlag>, FeatureFlagsError> {
        self.service.list().await.map_err(Into::into)
    }

    async fn register(&self, key: &str) -> Result<FeatureFlag, FeatureFlagsError> {
        self.service.register(key).await.map_err(Into::into)
    }

    async fn switch(&self, key: &str, enabled: bool) -> Result<FeatureFlag, FeatureFlagsError> {
        self.service.switch(key, enabled).await.map_err(Into::into)
    }
}
