//! Public models for the feature flags module.
//!
//! These are storage-agnostic data structures that define the contract
//! between the feature flags module and its consumers.

use chrono::{DateTime, Utc};

/// A stored feature flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureFlag {
    pub key: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
