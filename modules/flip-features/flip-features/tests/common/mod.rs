#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]

use flip_features::config::SchemaVersioning;
use flip_features::{FlipFeatures, FlipFeaturesConfig};
use sea_orm::{ConnectionTrait, DatabaseConnection, FromQueryResult, Statement};

/// Route `tracing` output through the test harness. Set `RUST_LOG` to see it.
pub fn init_tracing() {
    _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[must_use]
pub fn memory_config(versioning: SchemaVersioning) -> FlipFeaturesConfig {
    let mut config = FlipFeaturesConfig::default();
    config.schema.versioning = versioning;
    config
}

/// Fresh in-memory store, schema not applied.
pub async fn fresh_store(versioning: SchemaVersioning) -> FlipFeatures {
    init_tracing();
    FlipFeatures::connect(&memory_config(versioning))
        .await
        .expect("Failed to create test database")
}

/// Fresh in-memory store with the schema applied under the default configuration.
pub async fn ready_store() -> FlipFeatures {
    init_tracing();
    let features = FlipFeatures::connect(&FlipFeaturesConfig::default())
        .await
        .expect("Failed to create test database");
    features.apply_schema().await.expect("schema must apply");
    features
}

#[derive(Debug, FromQueryResult)]
struct TableName {
    name: String,
}

/// User tables in a `SQLite` store, sorted.
pub async fn sqlite_tables(conn: &DatabaseConnection) -> Vec<String> {
    let rows = TableName::find_by_statement(Statement::from_string(
        conn.get_database_backend(),
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    ))
    .all(conn)
    .await
    .expect("Query should succeed");
    rows.into_iter().map(|r| r.name).collect()
}

pub async fn exec(conn: &DatabaseConnection, sql: &str) {
    conn.execute(Statement::from_string(conn.get_database_backend(), sql))
        .await
        .expect("statement should succeed");
}
