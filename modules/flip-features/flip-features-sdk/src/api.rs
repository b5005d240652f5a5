use async_trait::async_trait;

use crate::errors::FeatureFlagsError;
use crate::models::FeatureFlag;

/// Feature flag store backed by the `flip_features` table.
///
/// Keys are never deleted through this API.
#[async_trait]
pub trait FeatureFlagsApi: Send + Sync {
    /// Stored value of a flag, or `None` when the key was never registered.
    async fn status(&self, key: &str) -> Result<Option<bool>, FeatureFlagsError>;

    /// Whether a flag is on. Unknown keys are off.
    async fn is_enabled(&self, key: &str) -> Result<bool, FeatureFlagsError>;

    async fn get(&self, key: &str) -> Result<Option<FeatureFlag>, FeatureFlagsError>;

    /// All stored flags ordered by key.
    async fn list(&self) -> Result<Vec<FeatureFlag>, FeatureFlagsError>;

    /// Create a disabled flag, or return the existing one untouched.
    async fn register(&self, key: &str) -> Result<FeatureFlag, FeatureFlagsError>;

    /// Set a flag, creating it when absent.
    async fn switch(&self, key: &str, enabled: bool) -> Result<FeatureFlag, FeatureFlagsError>;
}
