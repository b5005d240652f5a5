//! Typed configuration for the feature flags module.
//!
//! Sources are layered with Figment, later ones winning:
//! 1. Built-in defaults (in-memory `SQLite`, unversioned schema)
//! 2. An optional YAML file
//! 3. Environment variables prefixed with `FLIP_FEATURES__`, nested on `__`
//!    (e.g. `FLIP_FEATURES__DATABASE__DSN`)

use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "FLIP_FEATURES__";

/// Configuration error for typed config operations
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("invalid value for '{field}': {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlipFeaturesConfig {
    pub database: DatabaseConfig,
    pub schema: SchemaConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `sqlite:`, `postgres://` or `mysql://` DSN.
    pub dsn: String,
    pub pool: PoolCfg,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: "sqlite::memory:".to_owned(),
            pool: PoolCfg::default(),
        }
    }
}

/// Pool knobs; unset values keep the driver defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolCfg {
    pub max_conns: Option<u32>,
    pub min_conns: Option<u32>,
    #[serde(with = "humantime_serde")]
    pub acquire_timeout: Option<Duration>,
    #[serde(with = "humantime_serde")]
    pub idle_timeout: Option<Duration>,
}

/// How applied schema changes are versioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVersioning {
    /// Record each applied migration in a per-scope history table.
    Tracked,
    /// Run DDL only; the table itself is the sole record.
    #[default]
    Unversioned,
}

impl SchemaVersioning {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tracked => "tracked",
            Self::Unversioned => "unversioned",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub versioning: SchemaVersioning,
    /// Scope name hashed into the history table name.
    pub history_scope: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            versioning: SchemaVersioning::default(),
            history_scope: "flip_features".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Longest accepted key, in bytes. Matches the `VARCHAR(255)` key column by default.
    pub max_key_length: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_key_length: 255,
        }
    }
}

impl FlipFeaturesConfig {
    /// Layered Figment: defaults, then `path` (if any), then environment.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load and validate configuration.
    ///
    /// # Errors
    /// Returns `ConfigError::Load` if a source cannot be parsed or has the wrong shape,
    /// and `ConfigError::Invalid` if a value is out of range.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment(path))
    }

    /// Extract and validate configuration from an existing Figment.
    ///
    /// # Errors
    /// See [`FlipFeaturesConfig::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.dsn.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "database.dsn",
                message: "must not be empty".to_owned(),
            });
        }
        if self.database.pool.max_conns == Some(0) {
            return Err(ConfigError::Invalid {
                field: "database.pool.max_conns",
                message: "must be at least 1".to_owned(),
            });
        }
        if let (Some(min), Some(max)) = (self.database.pool.min_conns, self.database.pool.max_conns)
            && min > max
        {
            return Err(ConfigError::Invalid {
                field: "database.pool.min_conns",
                message: format!("{min} exceeds max_conns {max}"),
            });
        }
        if self.schema.history_scope.is_empty() {
            return Err(ConfigError::Invalid {
                field: "schema.history_scope",
                message: "must not be empty".to_owned(),
            });
        }
        if self.store.max_key_length == 0 {
            return Err(ConfigError::Invalid {
                field: "store.max_key_length",
                message: "must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}
