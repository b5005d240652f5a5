//! Read a table's column set back from the store catalog.
//!
//! Each backend reports types in its own vocabulary; [`ColumnKind`] folds them into
//! the handful of families the feature flag table uses.

use sea_orm::{ConnectionTrait, DatabaseBackend, DbErr, FromQueryResult, Statement};
use tracing::debug;

use crate::errors::ColumnDifference;

/// Normalized column type family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    String,
    Boolean,
    Timestamp,
    Other,
}

impl ColumnKind {
    /// Classify a catalog type name (`character varying`, `timestamp_text`, `tinyint`, ...).
    #[must_use]
    pub fn classify(data_type: &str) -> Self {
        let t = data_type.trim().to_ascii_lowercase();
        if t.contains("bool") || t.starts_with("tinyint") || t == "bit" {
            Self::Boolean
        } else if t.contains("timestamp") || t.contains("datetime") {
            // checked before text: SQLite reports `timestamp_text`
            Self::Timestamp
        } else if t.contains("char") || t.contains("text") || t == "string" {
            Self::String
        } else {
            Self::Other
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Timestamp => "timestamp",
            Self::Other => "other",
        }
    }
}

/// Expected column, as declared by the migration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub not_null: bool,
    /// Boolean default, when the column declares one.
    pub default: Option<bool>,
}

/// Column as reported by the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub kind: ColumnKind,
    pub not_null: bool,
    pub default: Option<String>,
}

#[derive(Debug, FromQueryResult)]
struct ColumnRow {
    name: String,
    data_type: String,
    not_null: i64,
    default_value: Option<String>,
}

impl From<ColumnRow> for ColumnInfo {
    fn from(row: ColumnRow) -> Self {
        Self {
            kind: ColumnKind::classify(&row.data_type),
            name: row.name,
            data_type: row.data_type,
            not_null: row.not_null != 0,
            default: row.default_value,
        }
    }
}

fn describe_statement(backend: DatabaseBackend, table: &str) -> Statement {
    let sql = match backend {
        DatabaseBackend::Postgres => {
            r"SELECT column_name::text AS name,
                     data_type::text AS data_type,
                     CAST(CASE WHEN is_nullable = 'NO' THEN 1 ELSE 0 END AS BIGINT) AS not_null,
                     column_default::text AS default_value
              FROM information_schema.columns
              WHERE table_schema = current_schema() AND table_name = $1
              ORDER BY ordinal_position"
        }
        DatabaseBackend::MySql => {
            r"SELECT CAST(column_name AS CHAR) AS name,
                     CAST(data_type AS CHAR) AS data_type,
                     CAST(CASE WHEN is_nullable = 'NO' THEN 1 ELSE 0 END AS SIGNED) AS not_null,
                     CAST(column_default AS CHAR) AS default_value
              FROM information_schema.columns
              WHERE table_schema = DATABASE() AND table_name = ?
              ORDER BY ordinal_position"
        }
        DatabaseBackend::Sqlite => {
            r#"SELECT name,
                      type AS data_type,
                      "notnull" AS not_null,
                      dflt_value AS default_value
               FROM pragma_table_info(?)
               ORDER BY cid"#
        }
    };
    Statement::from_sql_and_values(backend, sql, [table.into()])
}

/// Columns of `table` in declaration order. Empty when the table does not exist.
///
/// # Errors
/// Returns the driver error if the catalog query fails.
pub async fn describe_table(
    conn: &impl ConnectionTrait,
    table: &str,
) -> Result<Vec<ColumnInfo>, DbErr> {
    let backend = conn.get_database_backend();
    let rows = ColumnRow::find_by_statement(describe_statement(backend, table))
        .all(conn)
        .await?;

    debug!(table, columns = rows.len(), "Inspected table columns");
    Ok(rows.into_iter().map(ColumnInfo::from).collect())
}

/// Interpret a catalog default as a boolean literal.
///
/// Backends spell `false` as `false`, `FALSE`, `0`, `'0'` or `b'0'`.
#[must_use]
pub fn parse_bool_default(raw: &str) -> Option<bool> {
    let t = raw
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .trim_start_matches("b'")
        .trim_matches('\'')
        .to_ascii_lowercase();
    match t.as_str() {
        "false" | "0" | "f" => Some(false),
        "true" | "1" | "t" => Some(true),
        _ => None,
    }
}

/// Differences between the expected column set and what the store reports.
///
/// Column names compare case-insensitively; order is not significant.
#[must_use]
pub fn compare_columns(expected: &[ColumnSpec], found: &[ColumnInfo]) -> Vec<ColumnDifference> {
    let mut differences = Vec::new();

    for spec in expected {
        let Some(column) = found
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(spec.name))
        else {
            differences.push(ColumnDifference::Missing {
                column: spec.name.to_owned(),
            });
            continue;
        };

        if column.kind != spec.kind {
            differences.push(ColumnDifference::Mismatch {
                column: spec.name.to_owned(),
                expected: spec.kind.as_str().to_owned(),
                found: column.data_type.clone(),
            });
        }
        if column.not_null != spec.not_null {
            differences.push(ColumnDifference::Mismatch {
                column: spec.name.to_owned(),
                expected: nullability(spec.not_null).to_owned(),
                found: nullability(column.not_null).to_owned(),
            });
        }
        if let Some(want) = spec.default {
            let have = column.default.as_deref().and_then(parse_bool_default);
            if have != Some(want) {
                differences.push(ColumnDifference::Mismatch {
                    column: spec.name.to_owned(),
                    expected: format!("default {want}"),
                    found: column
                        .default
                        .as_deref()
                        .map_or_else(|| "no default".to_owned(), |d| format!("default {d}")),
                });
            }
        }
    }

    for column in found {
        if !expected
            .iter()
            .any(|spec| column.name.eq_ignore_ascii_case(spec.name))
        {
            differences.push(ColumnDifference::Unexpected {
                column: column.name.clone(),
            });
        }
    }

    differences
}

fn nullability(not_null: bool) -> &'static str {
    if not_null { "NOT NULL" } else { "NULL" }
}
