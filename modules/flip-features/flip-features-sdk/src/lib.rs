#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Flip Features SDK.
//!
//! This crate defines **storage-agnostic** types used by the `flip-features` module.
//!
//! # Public API
//!
//! - [`FeatureFlagsApi`]: read and toggle feature flags.
//! - [`FeatureFlag`]: one stored feature flag.
//! - [`FeatureFlagsError`]: errors surfaced to API consumers.

pub mod api;
pub mod errors;
pub mod models;

pub use api::FeatureFlagsApi;
pub use errors::FeatureFlagsError;
pub use models::FeatureFlag;
