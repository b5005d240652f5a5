use std::sync::Arc;

use flip_features_sdk::FeatureFlagsApi;
use sea_orm::DatabaseConnection;

use crate::config::FlipFeaturesConfig;
use crate::db;
use crate::domain::local_client::LocalClient;
use crate::domain::service::{Service, ServiceConfig};
use crate::errors::SchemaError;
use crate::infra::storage::SeaOrmFeatureRepository;
use crate::schema::{SchemaDefinition, SchemaReport, SchemaStatus};

/// Entry point: a store connection, the table definition, and the flag API over both.
pub struct FlipFeatures {
    conn: DatabaseConnection,
    schema: SchemaDefinition,
    api: Arc<dyn FeatureFlagsApi>,
}

impl FlipFeatures {
    /// Validate `config` and connect to the configured store. Does not touch the schema.
    ///
    /// # Errors
    /// Returns `SchemaError::InvalidConfig` for out-of-range settings or an unusable DSN,
    /// and `SchemaError::StoreUnavailable` if the store cannot be reached.
    pub async fn connect(config: &FlipFeaturesConfig) -> Result<Self, SchemaError> {
        config
            .validate()
            .map_err(|e| SchemaError::InvalidConfig(e.to_string()))?;
        let conn = db::connect(&config.database).await?;
        Ok(Self::from_connection(conn, config))
    }

    /// Wrap an existing connection.
    #[must_use]
    pub fn from_connection(conn: DatabaseConnection, config: &FlipFeaturesConfig) -> Self {
        let repo = Arc::new(SeaOrmFeatureRepository::new(conn.clone()));
        let service = Arc::new(Service::new(repo, ServiceConfig::from(&config.store)));
        let api: Arc<dyn FeatureFlagsApi> = Arc::new(LocalClient::new(service));

        Self {
            conn,
            schema: SchemaDefinition::new(&config.schema),
            api,
        }
    }

    #[must_use]
    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    #[must_use]
    pub fn schema(&self) -> &SchemaDefinition {
        &self.schema
    }

    #[must_use]
    pub fn api(&self) -> Arc<dyn FeatureFlagsApi> {
        Arc::clone(&self.api)
    }

    /// # Errors
    /// See [`SchemaDefinition::apply`].
    pub async fn apply_schema(&self) -> Result<SchemaReport, SchemaError> {
        self.schema.apply(&self.conn).await
    }

    /// # Errors
    /// See [`SchemaDefinition::ensure`].
    pub async fn ensure_schema(&self) -> Result<Option<SchemaReport>, SchemaError> {
        self.schema.ensure(&self.conn).await
    }

    /// # Errors
    /// See [`SchemaDefinition::verify`].
    pub async fn verify_schema(&self) -> Result<SchemaStatus, SchemaError> {
        self.schema.verify(&self.conn).await
    }

    /// # Errors
    /// See [`SchemaDefinition::revert`].
    pub async fn revert_schema(&self) -> Result<(), SchemaError> {
        self.schema.revert(&self.conn).await
    }
}
