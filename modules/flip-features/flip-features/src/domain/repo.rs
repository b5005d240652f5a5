use async_trait::async_trait;
use flip_features_sdk::FeatureFlag;

#[async_trait]
pub trait FeatureRepository: Send + Sync {
    async fn find(&self, key: &str) -> anyhow::Result<Option<FeatureFlag>>;

    async fn list(&self) -> anyhow::Result<Vec<FeatureFlag>>;

    /// Insert a row. `enabled: None` leaves the column to its store default.
    async fn insert(&self, key: &str, enabled: Option<bool>) -> anyhow::Result<FeatureFlag>;

    /// Update every row with `key`; `None` when no row matched.
    async fn update_enabled(&self, key: &str, enabled: bool)
    -> anyhow::Result<Option<FeatureFlag>>;
}
