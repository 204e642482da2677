//! `SQLite`-backed record store.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{ffi, params, Connection};
use tracing::{debug, info};

use super::{migrations, LoadOutcome, RecordStore};
use crate::error::{Error, Result};
use crate::record::{Availability, Experience, Registration, RegistrationType};

/// Default time a writer waits on another writer's lock.
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Durable record store.
///
/// Each append is one `INSERT`, so it is atomic across threads and
/// processes sharing the database file. Writers that find the database
/// locked wait up to the busy timeout instead of failing.
#[derive(Debug)]
pub struct SqliteStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path with the default busy timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_timeout(path, DEFAULT_BUSY_TIMEOUT)
    }

    /// Open or create a store at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open_with_timeout(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // Set before anything else touches the file so concurrent openers wait
        conn.busy_timeout(busy_timeout)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(conn),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::internal("sqlite connection lock poisoned"))
    }
}

impl RecordStore for SqliteStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn append(&self, record: &Registration) -> Result<u64> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            r"
            INSERT INTO registrations (
                id, name, email, phone, registration_type,
                experience, availability, motivation, registered_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
            params![
                record.id,
                record.name,
                record.email,
                record.phone,
                record.registration_type.as_str(),
                record.experience.as_str(),
                record.availability.as_str(),
                record.motivation,
                record.registered_at.to_rfc3339(),
            ],
        );

        inserted.map_err(|e| insert_error(e, &record.id))?;

        let seq = u64::try_from(conn.last_insert_rowid())
            .map_err(|_| Error::internal("negative sequence number"))?;
        debug!(id = %record.id, seq, "Appended registration");
        Ok(seq)
    }

    fn read_all(&self) -> Result<LoadOutcome> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r"
            SELECT seq, id, name, email, phone, registration_type,
                   experience, availability, motivation, registered_at
            FROM registrations ORDER BY seq ASC
            ",
        )?;

        let rows = stmt
            .query_map([], StoredRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match row.decode() {
                Ok(record) => records.push(record),
                Err(reason) => return Ok(LoadOutcome::Unreadable { reason }),
            }
        }
        Ok(LoadOutcome::from_records(records))
    }

    fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM registrations", [], |row| row.get(0))?;
        u64::try_from(count).map_err(|_| Error::internal("negative record count"))
    }
}

/// Only a unique-constraint failure means the id is taken.
fn insert_error(err: rusqlite::Error, id: &str) -> Error {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE => {
            Error::DuplicateId { id: id.to_string() }
        }
        other => other.into(),
    }
}

/// A row as stored, before enum and timestamp decoding.
struct StoredRow {
    seq: i64,
    id: String,
    name: String,
    email: String,
    phone: String,
    registration_type: String,
    experience: String,
    availability: String,
    motivation: String,
    registered_at: String,
}

impl StoredRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            seq: row.get(0)?,
            id: row.get(1)?,
            name: row.get(2)?,
            email: row.get(3)?,
            phone: row.get(4)?,
            registration_type: row.get(5)?,
            experience: row.get(6)?,
            availability: row.get(7)?,
            motivation: row.get(8)?,
            registered_at: row.get(9)?,
        })
    }

    /// Decode into a record, describing the first bad field on failure.
    fn decode(self) -> std::result::Result<Registration, String> {
        let seq = self.seq;
        let bad = |e: &dyn std::fmt::Display| format!("row {seq}: {e}");

        let registration_type: RegistrationType =
            self.registration_type.parse().map_err(|e| bad(&e))?;
        let experience: Experience = self.experience.parse().map_err(|e| bad(&e))?;
        let availability: Availability = self.availability.parse().map_err(|e| bad(&e))?;
        let registered_at = DateTime::parse_from_rfc3339(&self.registered_at)
            .map_err(|e| bad(&format!("bad registered_at '{}': {e}", self.registered_at)))?
            .with_timezone(&Utc);

        Ok(Registration {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            registration_type,
            experience,
            availability,
            motivation: self.motivation,
            registered_at,
        })
    }
}
