//! Schema-version history for the tracked versioning strategy.
//!
//! Applied migrations are recorded in a history table named
//! `flip_migrations__<prefix>__<hash8>`, where `<hash8>` is an 8-character hex hash
//! of the scope name via `xxh3_64`. Distinct scopes sharing one database never see
//! each other's history.

use sea_orm::{ConnectionTrait, DatabaseBackend, DbErr, FromQueryResult, Statement};
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

use super::inspect::describe_table;

#[derive(Debug, FromQueryResult)]
struct RecordCount {
    applied: i64,
}

/// Sanitize a scope name into a safe identifier fragment.
///
/// Rules:
/// - Allowed: `[a-zA-Z0-9_]`
/// - Everything else becomes `_`
fn sanitize_scope(name: &str) -> String {
    let out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() { "_".to_owned() } else { out }
}

/// Build the history table name for a scope.
///
/// - `<prefix>` is the sanitized scope
/// - `<hash8>` is a stable hash of the ORIGINAL scope
/// - Name is capped to the Postgres 63-byte identifier limit
#[must_use]
pub fn history_table_name(scope: &str) -> String {
    const PREFIX: &str = "flip_migrations__";
    const SEP: &str = "__";
    const HASH_LEN: usize = 8;
    const PG_IDENT_MAX: usize = 63;

    let sanitized = sanitize_scope(scope);
    let hash = xxh3_64(scope.as_bytes());
    let hash8 = &format!("{hash:016x}")[..HASH_LEN];

    let max_prefix_len = PG_IDENT_MAX.saturating_sub(PREFIX.len() + SEP.len() + HASH_LEN);
    let prefix_part = if sanitized.len() > max_prefix_len {
        &sanitized[..max_prefix_len]
    } else {
        sanitized.as_str()
    };

    format!("{PREFIX}{prefix_part}{SEP}{hash8}")
}

fn quote(backend: DatabaseBackend, table: &str) -> String {
    match backend {
        DatabaseBackend::MySql => format!("`{table}`"),
        DatabaseBackend::Postgres | DatabaseBackend::Sqlite => format!("\"{table}\""),
    }
}

fn placeholder(backend: DatabaseBackend) -> &'static str {
    match backend {
        DatabaseBackend::Postgres => "$1",
        DatabaseBackend::MySql | DatabaseBackend::Sqlite => "?",
    }
}

/// Create the history table if it doesn't exist.
///
/// # Errors
/// Returns the driver error if the DDL fails.
pub async fn ensure_table(conn: &impl ConnectionTrait, table: &str) -> Result<(), DbErr> {
    let backend = conn.get_database_backend();
    let name = quote(backend, table);

    let sql = match backend {
        DatabaseBackend::Postgres => format!(
            "CREATE TABLE IF NOT EXISTS {name} (
                version VARCHAR(255) PRIMARY KEY,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
            )"
        ),
        DatabaseBackend::MySql => format!(
            "CREATE TABLE IF NOT EXISTS {name} (
                version VARCHAR(255) PRIMARY KEY,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )"
        ),
        DatabaseBackend::Sqlite => format!(
            "CREATE TABLE IF NOT EXISTS {name} (
                version TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )"
        ),
    };

    conn.execute(Statement::from_string(backend, sql)).await?;
    Ok(())
}

/// Whether the history table exists at all.
///
/// # Errors
/// Returns the driver error if the catalog query fails.
pub async fn exists(conn: &impl ConnectionTrait, table: &str) -> Result<bool, DbErr> {
    Ok(!describe_table(conn, table).await?.is_empty())
}

/// Whether `migration` is recorded. A missing history table counts as "not recorded".
///
/// # Errors
/// Returns the driver error if the lookup fails.
pub async fn is_recorded(
    conn: &impl ConnectionTrait,
    table: &str,
    migration: &str,
) -> Result<bool, DbErr> {
    if !exists(conn, table).await? {
        return Ok(false);
    }

    let backend = conn.get_database_backend();
    let sql = format!(
        "SELECT CAST(COUNT(*) AS {int}) AS applied FROM {name} WHERE version = {p}",
        int = if backend == DatabaseBackend::MySql { "SIGNED" } else { "BIGINT" },
        name = quote(backend, table),
        p = placeholder(backend),
    );

    let count = RecordCount::find_by_statement(Statement::from_sql_and_values(
        backend,
        sql,
        [migration.into()],
    ))
    .one(conn)
    .await?
    .map_or(0, |r| r.applied);

    debug!(history = table, migration, recorded = count > 0, "Checked migration history");
    Ok(count > 0)
}

/// Record a migration as applied.
///
/// # Errors
/// Returns the driver error if the insert fails (including a duplicate record).
pub async fn record(conn: &impl ConnectionTrait, table: &str, migration: &str) -> Result<(), DbErr> {
    let backend = conn.get_database_backend();
    let sql = format!(
        "INSERT INTO {} (version) VALUES ({})",
        quote(backend, table),
        placeholder(backend)
    );
    conn.execute(Statement::from_sql_and_values(backend, sql, [migration.into()]))
        .await?;
    Ok(())
}

/// Remove a migration record. Returns whether a record was removed.
///
/// # Errors
/// Returns the driver error if the delete fails.
pub async fn forget(conn: &impl ConnectionTrait, table: &str, migration: &str) -> Result<bool, DbErr> {
    let backend = conn.get_database_backend();
    let sql = format!(
        "DELETE FROM {} WHERE version = {}",
        quote(backend, table),
        placeholder(backend)
    );
    let res = conn
        .execute(Statement::from_sql_and_values(backend, sql, [migration.into()]))
        .await?;
    Ok(res.rows_affected() > 0)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_non_identifier_chars() {
        assert_eq!(sanitize_scope("flip_features"), "flip_features");
        assert_eq!(sanitize_scope("flip-features"), "flip_features");
        assert_eq!(sanitize_scope("Tenant42"), "Tenant42");
        assert_eq!(sanitize_scope("app.flags/v2"), "app_flags_v2");
        assert_eq!(sanitize_scope(""), "_");
    }

    #[test]
    fn history_table_name_is_deterministic_and_scoped() {
        let a1 = history_table_name("flip_features");
        let a2 = history_table_name("flip_features");
        assert_eq!(a1, a2, "deterministic");
        assert!(a1.starts_with("flip_migrations__flip_features__"));

        // Same sanitized prefix, different original scope: hash keeps them apart.
        assert_ne!(history_table_name("flip-features"), a1);
    }

    #[test]
    fn history_table_name_fits_postgres_identifier_limit() {
        let long = "a-very-long-scope-name/with.weird.chars/and-more-and-more-and-more-and-more";
        let t = history_table_name(long);
        assert!(t.len() <= 63);
        assert!(t.starts_with("flip_migrations__"));
    }

    #[cfg(feature = "db-sqlite")]
    mod sqlite_tests {
        use super::*;
        use crate::config::DatabaseConfig;
        use crate::db::connect;

        #[tokio::test]
        async fn record_lookup_and_forget() {
            let conn = connect(&DatabaseConfig::default())
                .await
                .expect("Failed to create test database");
            let table = history_table_name("history_test");

            assert!(!exists(&conn, &table).await.unwrap());
            assert!(!is_recorded(&conn, &table, "m0001").await.unwrap());

            ensure_table(&conn, &table).await.unwrap();
            ensure_table(&conn, &table).await.expect("ensure must be repeatable");
            assert!(exists(&conn, &table).await.unwrap());

            record(&conn, &table, "m0001").await.unwrap();
            assert!(is_recorded(&conn, &table, "m0001").await.unwrap());
            assert!(!is_recorded(&conn, &table, "m0002").await.unwrap());

            assert!(record(&conn, &table, "m0001").await.is_err(), "duplicate record");

            assert!(forget(&conn, &table, "m0001").await.unwrap());
            assert!(!forget(&conn, &table, "m0001").await.unwrap());
            assert!(!is_recorded(&conn, &table, "m0001").await.unwrap());
        }
    }
}
