//! Schema versioning for the `SQLite` store.
//!
//! The browser layout had no schema version at all; the `SQLite` store keeps
//! one in the `metadata` table. Each entry in [`MIGRATIONS`] moves the
//! database up by one version and is applied in its own transaction together
//! with the version bump.

use rusqlite::Connection;
use tracing::info;

use super::schema::{CREATE_METADATA_TABLE, SCHEMA_STATEMENTS};
use crate::error::{Error, Result};

/// One schema step.
#[derive(Debug)]
struct Migration {
    /// Version the database is at after this step.
    version: i32,
    /// Statements run, in order, to reach it.
    statements: &'static [&'static str],
}

/// Every migration, oldest first.
const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    statements: SCHEMA_STATEMENTS,
}];

/// The schema version this build writes.
pub const CURRENT_VERSION: i32 = 1;

/// Metadata key holding the schema version.
const VERSION_KEY: &str = "schema_version";

/// Bring the database up to [`CURRENT_VERSION`].
///
/// Safe to call on every open: a database that is already current is left
/// untouched.
///
/// # Errors
///
/// Returns an error if a migration fails, or if the database was written by a
/// newer schema version.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;

    let found = schema_version(conn)?;
    if found > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {found} is newer than supported version {CURRENT_VERSION}"
            ),
        });
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > found) {
        apply(conn, migration)?;
    }
    Ok(())
}

/// Schema version recorded in the database, 0 when none is recorded.
///
/// # Errors
///
/// Returns an error if the metadata table cannot be read or holds a value
/// that is not a number.
pub fn schema_version(conn: &Connection) -> Result<i32> {
    let stored = conn.query_row(
        "SELECT value FROM metadata WHERE key = ?1",
        [VERSION_KEY],
        |row| row.get::<_, String>(0),
    );

    match stored {
        Ok(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

fn apply(conn: &Connection, migration: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    for statement in migration.statements {
        tx.execute(statement, [])?;
    }
    tx.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, migration.version.to_string()),
    )?;
    tx.commit()?;

    info!(version = migration.version, "Applied schema migration");
    Ok(())
}
