//! Errors raised while connecting to the store or managing the feature flag table.

use std::fmt;

use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    /// The store could not be reached or no connection could be acquired.
    /// Retrying the whole operation later may succeed.
    #[error("feature flag store unavailable: {source}")]
    StoreUnavailable {
        #[source]
        source: DbErr,
    },

    /// The store already holds state that the requested operation would clobber.
    /// Needs a reversal or manual cleanup before retrying.
    #[error("schema conflict on table '{table}': {reason}")]
    SchemaConflict {
        table: String,
        reason: ConflictReason,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{operation} failed: {source}")]
    Statement {
        operation: &'static str,
        #[source]
        source: DbErr,
    },
}

impl SchemaError {
    /// Classify a driver error raised while running `operation`.
    #[must_use]
    pub fn from_db(operation: &'static str, source: DbErr) -> Self {
        if is_connectivity_error(&source) {
            Self::StoreUnavailable { source }
        } else {
            Self::Statement { operation, source }
        }
    }

    #[must_use]
    pub fn conflict(table: impl Into<String>, reason: ConflictReason) -> Self {
        Self::SchemaConflict {
            table: table.into(),
            reason,
        }
    }

    #[must_use]
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }

    #[must_use]
    pub fn conflict_reason(&self) -> Option<&ConflictReason> {
        match self {
            Self::SchemaConflict { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// True when the error comes from reaching the store rather than from a statement.
#[must_use]
pub fn is_connectivity_error(err: &DbErr) -> bool {
    matches!(err, DbErr::ConnectionAcquire(_) | DbErr::Conn(_))
}

/// Why an operation refused to touch the feature flag table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictReason {
    /// The table exists with the expected columns.
    AlreadyExists,
    /// The table exists but its columns differ from the expected set.
    IncompatibleShape { differences: Vec<ColumnDifference> },
    /// History says the migration ran, yet the table is gone.
    AlreadyRecorded {
        migration: String,
        history_table: String,
    },
    /// Nothing to revert.
    NotPresent,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists => f.write_str("table already exists"),
            Self::IncompatibleShape { differences } => {
                f.write_str("table exists with an incompatible shape")?;
                for (i, d) in differences.iter().enumerate() {
                    f.write_str(if i == 0 { ": " } else { ", " })?;
                    write!(f, "{d}")?;
                }
                Ok(())
            }
            Self::AlreadyRecorded {
                migration,
                history_table,
            } => write!(
                f,
                "migration '{migration}' is recorded in '{history_table}' but the table is missing"
            ),
            Self::NotPresent => f.write_str("table does not exist"),
        }
    }
}

/// One difference between the expected and the stored column set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnDifference {
    Missing {
        column: String,
    },
    Unexpected {
        column: String,
    },
    Mismatch {
        column: String,
        expected: String,
        found: String,
    },
}

impl fmt::Display for ColumnDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { column } => write!(f, "missing column '{column}'"),
            Self::Unexpected { column } => write!(f, "unexpected column '{column}'"),
            Self::Mismatch {
                column,
                expected,
                found,
            } => write!(f, "column '{column}' expected {expected}, found {found}"),
        }
    }
}
