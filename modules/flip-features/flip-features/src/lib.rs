#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Flip Features module implementation.
//!
//! Owns the `flip_features` table: its migration, shape inspection, optional
//! schema-version history, and a feature flag store on top of it.
//!
//! The public API is defined in `flip-features-sdk` and re-exported here.
//!
//! # Example
//! ```rust,no_run
//! use flip_features::{FlipFeatures, FlipFeaturesConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = FlipFeaturesConfig::load(None)?;
//! let features = FlipFeatures::connect(&config).await?;
//! features.apply_schema().await?;
//!
//! let api = features.api();
//! api.register("dark_mode").await?;
//! assert!(!api.is_enabled("dark_mode").await?);
//! # Ok(())
//! # }
//! ```

pub use flip_features_sdk::{FeatureFlag, FeatureFlagsApi, FeatureFlagsError};

pub mod config;
pub mod db;
pub mod errors;
pub mod module;
pub mod schema;

pub use config::{FlipFeaturesConfig, SchemaVersioning};
pub use errors::{ColumnDifference, ConflictReason, SchemaError};
pub use module::FlipFeatures;
pub use schema::{SchemaDefinition, SchemaReport, SchemaStatus};

#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
