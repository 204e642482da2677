//! Record storage for enlist.
//!
//! The form and the admin view only see the [`RecordStore`] trait, so the
//! backing store can be swapped without touching either. Two backends ship
//! with the crate:
//!
//! - [`SqliteStore`]: durable, safe for several writer processes
//! - [`MemoryStore`]: process-local, used in tests and dry runs
//!
//! Appends are single atomic operations in both backends. Nothing here reads
//! the full list, modifies it and writes it back, so concurrent writers cannot
//! overwrite each other's records.

mod memory;
pub mod migrations;
pub mod schema;
pub mod slot;
mod sqlite;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{Config, StorageBackend};
use crate::error::{Error, Result};
use crate::record::Registration;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// What to do when stored records cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadPolicy {
    /// Treat unreadable data as an empty store and log a warning.
    #[default]
    Lenient,
    /// Fail with [`Error::StoreUnreadable`].
    Strict,
}

/// Result of reading every record from a store.
///
/// Keeps "nothing stored yet" apart from "something stored but unreadable"
/// so that callers can pick a policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No records are stored.
    Empty,
    /// Records in insertion order. Never empty.
    Loaded(Vec<Registration>),
    /// Stored data exists but could not be decoded.
    Unreadable {
        /// Why decoding failed.
        reason: String,
    },
}

impl LoadOutcome {
    /// Wrap a list, mapping an empty list to [`LoadOutcome::Empty`].
    #[must_use]
    pub fn from_records(records: Vec<Registration>) -> Self {
        if records.is_empty() {
            Self::Empty
        } else {
            Self::Loaded(records)
        }
    }

    /// Number of decoded records.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Loaded(records) => records.len(),
            Self::Empty | Self::Unreadable { .. } => 0,
        }
    }

    /// True when no records were decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when stored data could not be decoded.
    #[must_use]
    pub fn is_unreadable(&self) -> bool {
        matches!(self, Self::Unreadable { .. })
    }

    /// Turn the outcome into a record list according to `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnreadable`] for unreadable data under
    /// [`ReadPolicy::Strict`].
    pub fn resolve(self, policy: ReadPolicy) -> Result<Vec<Registration>> {
        match self {
            Self::Empty => Ok(Vec::new()),
            Self::Loaded(records) => Ok(records),
            Self::Unreadable { reason } => match policy {
                ReadPolicy::Lenient => {
                    warn!(%reason, "Stored registrations are unreadable; treating as empty");
                    Ok(Vec::new())
                }
                ReadPolicy::Strict => Err(Error::StoreUnreadable { reason }),
            },
        }
    }
}

/// Append-only storage for registration records.
pub trait RecordStore: Send + Sync + fmt::Debug {
    /// Short backend name for logging.
    fn name(&self) -> &'static str;

    /// Append a record.
    ///
    /// Returns the record's sequence number, starting at 1 and increasing
    /// with every append.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateId`] when a record with the same id is
    /// already stored, or a backend error if the write fails.
    fn append(&self, record: &Registration) -> Result<u64>;

    /// Read every record in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend itself fails. Stored data that
    /// cannot be decoded is reported as [`LoadOutcome::Unreadable`].
    fn read_all(&self) -> Result<LoadOutcome>;

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn count(&self) -> Result<u64> {
        let len = self.read_all()?.len();
        u64::try_from(len).map_err(|_| Error::internal("record count overflow"))
    }

    /// Read every record and apply `policy` to unreadable data.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails, or if the data is unreadable
    /// under [`ReadPolicy::Strict`].
    fn read_with(&self, policy: ReadPolicy) -> Result<Vec<Registration>> {
        self.read_all()?.resolve(policy)
    }
}

/// Open the store selected by `config`.
///
/// # Errors
///
/// Returns an error if the `SQLite` database cannot be opened.
pub fn open_store(config: &Config) -> Result<Box<dyn RecordStore>> {
    match config.storage.backend {
        StorageBackend::Sqlite => Ok(Box::new(SqliteStore::open_with_timeout(
            config.database_path(),
            config.busy_timeout(),
        )?)),
        StorageBackend::Memory => Ok(Box::new(MemoryStore::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::sample;
    use crate::record::RegistrationType;

    #[test]
    fn test_from_records_empty() {
        assert_eq!(LoadOutcome::from_records(Vec::new()), LoadOutcome::Empty);
    }

    #[test]
    fn test_from_records_loaded() {
        let r = sample("Ada", "ada@x.com", RegistrationType::Volunteer);
        let outcome = LoadOutcome::from_records(vec![r.clone()]);
        assert_eq!(outcome.len(), 1);
        assert_eq!(outcome, LoadOutcome::Loaded(vec![r]));
    }

    #[test]
    fn test_resolve_lenient_unreadable_is_empty() {
        let outcome = LoadOutcome::Unreadable {
            reason: "garbage".to_string(),
        };
        assert!(outcome.is_unreadable());
        assert!(outcome.resolve(ReadPolicy::Lenient).unwrap().is_empty());
    }

    #[test]
    fn test_resolve_strict_unreadable_errors() {
        let outcome = LoadOutcome::Unreadable {
            reason: "garbage".to_string(),
        };
        let err = outcome.resolve(ReadPolicy::Strict).unwrap_err();
        assert!(matches!(err, Error::StoreUnreadable { .. }));
        assert!(err.to_string().contains("garbage"));
    }

    #[test]
    fn test_resolve_strict_empty_is_ok() {
        assert!(LoadOutcome::Empty
            .resolve(ReadPolicy::Strict)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_read_policy_default() {
        assert_eq!(ReadPolicy::default(), ReadPolicy::Lenient);
    }

    #[test]
    fn test_open_store_memory() {
        let mut config = Config::default();
        config.storage.backend = StorageBackend::Memory;

        let store = open_store(&config).unwrap();
        assert_eq!(store.name(), "memory");
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_open_store_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.database_path = Some(dir.path().join("nested").join("r.db"));

        let store = open_store(&config).unwrap();
        assert_eq!(store.name(), "sqlite");
        store
            .append(&sample("Ada", "ada@x.com", RegistrationType::Volunteer))
            .unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }
}
