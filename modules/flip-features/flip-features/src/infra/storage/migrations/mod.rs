//! Schema migrations for the feature flag table.

use sea_orm_migration::{MigrationTrait, MigratorTrait};

use super::inspect::{ColumnKind, ColumnSpec};

pub mod m0001_create_flip_features;

/// Name of the feature flag table.
pub const FEATURES_TABLE: &str = "flip_features";

/// Column set created by [`m0001_create_flip_features`].
pub const FEATURE_COLUMNS: [ColumnSpec; 4] = [
    ColumnSpec {
        name: "key",
        kind: ColumnKind::String,
        not_null: true,
        default: None,
    },
    ColumnSpec {
        name: "enabled",
        kind: ColumnKind::Boolean,
        not_null: true,
        default: Some(false),
    },
    ColumnSpec {
        name: "created_at",
        kind: ColumnKind::Timestamp,
        not_null: true,
        default: None,
    },
    ColumnSpec {
        name: "updated_at",
        kind: ColumnKind::Timestamp,
        not_null: true,
        default: None,
    },
];

/// Exposes the migrations to an external `sea-orm-migration` runner.
pub struct Migrator;

impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m0001_create_flip_features::Migration)]
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use sea_orm_migration::MigrationName;

    #[test]
    fn migrator_lists_the_table_migration() {
        let migrations = Migrator::migrations();
        assert_eq!(migrations.len(), 1);
        assert_eq!(migrations[0].name(), "m0001_create_flip_features");
    }
}
