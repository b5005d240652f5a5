//! Lifecycle of the `flip_features` table.
//!
//! [`SchemaDefinition::apply`] creates the table exactly once: a second run fails
//! with [`ConflictReason::AlreadyExists`] until [`SchemaDefinition::revert`] drops it.
//! [`SchemaDefinition::ensure`] is the idempotent variant for callers that only want
//! the table to be there.
//!
//! With [`SchemaVersioning::Tracked`] the applied migration is also recorded in a
//! history table, inside the same transaction as the DDL where the backend allows it.

use sea_orm::{ConnectionTrait, TransactionTrait};
use sea_orm_migration::{MigrationName, MigrationTrait, SchemaManager};
use tracing::{debug, info, warn};

use crate::config::{SchemaConfig, SchemaVersioning};
use crate::errors::{ConflictReason, SchemaError};
use crate::infra::storage::history;
use crate::infra::storage::inspect::{ColumnInfo, compare_columns, describe_table};
use crate::infra::storage::migrations::{
    FEATURE_COLUMNS, FEATURES_TABLE, m0001_create_flip_features,
};

/// Whether the feature flag table is in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    Absent,
    /// Present with the expected column set.
    Present,
}

/// Outcome of a successful [`SchemaDefinition::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaReport {
    pub table: &'static str,
    pub migration: String,
    /// History table the migration was recorded in, for tracked versioning.
    pub history_table: Option<String>,
}

/// The feature flag table and how changes to it are versioned.
#[derive(Debug, Clone)]
pub struct SchemaDefinition {
    versioning: SchemaVersioning,
    history_table: String,
}

impl Default for SchemaDefinition {
    fn default() -> Self {
        Self::new(&SchemaConfig::default())
    }
}

impl SchemaDefinition {
    #[must_use]
    pub fn new(cfg: &SchemaConfig) -> Self {
        Self {
            versioning: cfg.versioning,
            history_table: history::history_table_name(&cfg.history_scope),
        }
    }

    #[must_use]
    pub fn table(&self) -> &'static str {
        FEATURES_TABLE
    }

    #[must_use]
    pub fn versioning(&self) -> SchemaVersioning {
        self.versioning
    }

    /// History table name, when versioning is tracked.
    #[must_use]
    pub fn history_table(&self) -> Option<&str> {
        match self.versioning {
            SchemaVersioning::Tracked => Some(&self.history_table),
            SchemaVersioning::Unversioned => None,
        }
    }

    /// Current columns of the feature flag table; empty when it does not exist.
    ///
    /// # Errors
    /// Returns `StoreUnavailable` if the store cannot be reached.
    pub async fn describe(&self, conn: &impl ConnectionTrait) -> Result<Vec<ColumnInfo>, SchemaError> {
        describe_table(conn, FEATURES_TABLE)
            .await
            .map_err(|e| SchemaError::from_db("inspect table", e))
    }

    /// Check the table without changing anything.
    ///
    /// # Errors
    /// Returns `SchemaConflict` with [`ConflictReason::IncompatibleShape`] when the table
    /// exists with other columns, and `StoreUnavailable` if the store cannot be reached.
    pub async fn verify(&self, conn: &impl ConnectionTrait) -> Result<SchemaStatus, SchemaError> {
        let found = self.describe(conn).await?;
        if found.is_empty() {
            debug!(table = FEATURES_TABLE, "Feature flag table absent");
            return Ok(SchemaStatus::Absent);
        }

        let differences = compare_columns(&FEATURE_COLUMNS, &found);
        if differences.is_empty() {
            debug!(table = FEATURES_TABLE, "Feature flag table present");
            Ok(SchemaStatus::Present)
        } else {
            let reason = ConflictReason::IncompatibleShape { differences };
            warn!(table = FEATURES_TABLE, %reason, "Feature flag table has an unexpected shape");
            Err(SchemaError::conflict(FEATURES_TABLE, reason))
        }
    }

    /// Create the feature flag table.
    ///
    /// # Errors
    /// - `SchemaConflict` if the table already exists (same or different shape), or the
    ///   tracked history already records the migration.
    /// - `StoreUnavailable` if the store cannot be reached.
    /// - `Statement` if the DDL itself fails.
    pub async fn apply<C>(&self, conn: &C) -> Result<SchemaReport, SchemaError>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let found = self.describe(conn).await?;
        if !found.is_empty() {
            let differences = compare_columns(&FEATURE_COLUMNS, &found);
            let reason = if differences.is_empty() {
                ConflictReason::AlreadyExists
            } else {
                ConflictReason::IncompatibleShape { differences }
            };
            warn!(table = FEATURES_TABLE, %reason, "Refusing to apply feature flag schema");
            return Err(SchemaError::conflict(FEATURES_TABLE, reason));
        }

        let migration = m0001_create_flip_features::Migration;
        let name = migration.name().to_owned();

        if let Some(history_table) = self.history_table() {
            let recorded = history::is_recorded(conn, history_table, &name)
                .await
                .map_err(|e| SchemaError::from_db("query migration history", e))?;
            if recorded {
                let reason = ConflictReason::AlreadyRecorded {
                    migration: name,
                    history_table: history_table.to_owned(),
                };
                warn!(table = FEATURES_TABLE, %reason, "Refusing to apply feature flag schema");
                return Err(SchemaError::conflict(FEATURES_TABLE, reason));
            }
        }

        info!(
            table = FEATURES_TABLE,
            migration = %name,
            versioning = self.versioning.as_str(),
            "Applying feature flag schema"
        );

        // Best-effort atomicity: some backends auto-commit DDL.
        let txn = conn
            .begin()
            .await
            .map_err(|e| SchemaError::from_db("begin transaction", e))?;

        let res: Result<(), SchemaError> = (async {
            let manager = SchemaManager::new(&txn);
            migration
                .up(&manager)
                .await
                .map_err(|e| SchemaError::from_db("create table", e))?;

            if let Some(history_table) = self.history_table() {
                history::ensure_table(&txn, history_table)
                    .await
                    .map_err(|e| SchemaError::from_db("create history table", e))?;
                history::record(&txn, history_table, &name)
                    .await
                    .map_err(|e| SchemaError::from_db("record migration", e))?;
            }
            Ok(())
        })
        .await;

        match res {
            Ok(()) => txn
                .commit()
                .await
                .map_err(|e| SchemaError::from_db("commit transaction", e))?,
            Err(err) => {
                _ = txn.rollback().await;
                return Err(err);
            }
        }

        info!(table = FEATURES_TABLE, migration = %name, "Feature flag schema applied");

        Ok(SchemaReport {
            table: FEATURES_TABLE,
            migration: name,
            history_table: self.history_table().map(str::to_owned),
        })
    }

    /// Apply the schema only when the table is absent.
    ///
    /// Returns the report when the table was created, `None` when it was already there.
    ///
    /// # Errors
    /// Same as [`SchemaDefinition::verify`] and [`SchemaDefinition::apply`].
    pub async fn ensure<C>(&self, conn: &C) -> Result<Option<SchemaReport>, SchemaError>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        match self.verify(conn).await? {
            SchemaStatus::Present => Ok(None),
            SchemaStatus::Absent => self.apply(conn).await.map(Some),
        }
    }

    /// Drop the feature flag table and forget its history record.
    ///
    /// Rows are dropped with the table.
    ///
    /// # Errors
    /// - `SchemaConflict` with [`ConflictReason::NotPresent`] when there is no table.
    /// - `StoreUnavailable` if the store cannot be reached.
    /// - `Statement` if the DDL fails.
    pub async fn revert<C>(&self, conn: &C) -> Result<(), SchemaError>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        if self.describe(conn).await?.is_empty() {
            return Err(SchemaError::conflict(
                FEATURES_TABLE,
                ConflictReason::NotPresent,
            ));
        }

        let migration = m0001_create_flip_features::Migration;
        let name = migration.name().to_owned();

        let history_table = match self.history_table() {
            Some(table) => history::exists(conn, table)
                .await
                .map_err(|e| SchemaError::from_db("query migration history", e))?
                .then_some(table),
            None => None,
        };

        info!(table = FEATURES_TABLE, migration = %name, "Reverting feature flag schema");

        let txn = conn
            .begin()
            .await
            .map_err(|e| SchemaError::from_db("begin transaction", e))?;

        let res: Result<(), SchemaError> = (async {
            let manager = SchemaManager::new(&txn);
            migration
                .down(&manager)
                .await
                .map_err(|e| SchemaError::from_db("drop table", e))?;

            if let Some(history_table) = history_table {
                let removed = history::forget(&txn, history_table, &name)
                    .await
                    .map_err(|e| SchemaError::from_db("forget migration", e))?;
                if !removed {
                    debug!(history = history_table, migration = %name, "No history record to remove");
                }
            }
            Ok(())
        })
        .await;

        match res {
            Ok(()) => txn
                .commit()
                .await
                .map_err(|e| SchemaError::from_db("commit transaction", e))?,
            Err(err) => {
                _ = txn.rollback().await;
                return Err(err);
            }
        }

        info!(table = FEATURES_TABLE, "Feature flag schema reverted");
        Ok(())
    }
}
