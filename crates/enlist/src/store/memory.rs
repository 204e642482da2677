//! In-memory record store.

use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use super::{LoadOutcome, RecordStore};
use crate::error::{Error, Result};
use crate::record::Registration;

/// Process-local store backed by a mutex-guarded vector.
///
/// The duplicate check and the push happen under one lock, so appends from
/// several threads never lose records.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<Registration>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `records`.
    #[must_use]
    pub fn with_records(records: Vec<Registration>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Registration>>> {
        self.records
            .lock()
            .map_err(|_| Error::internal("memory store lock poisoned"))
    }
}

impl RecordStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn append(&self, record: &Registration) -> Result<u64> {
        let mut records = self.lock()?;
        if records.iter().any(|r| r.id == record.id) {
            return Err(Error::DuplicateId {
                id: record.id.clone(),
            });
        }
        records.push(record.clone());
        let seq = u64::try_from(records.len()).map_err(|_| Error::internal("sequence overflow"))?;
        debug!(id = %record.id, seq, "Appended registration to memory store");
        Ok(seq)
    }

    fn read_all(&self) -> Result<LoadOutcome> {
        Ok(LoadOutcome::from_records(self.lock()?.clone()))
    }

    fn count(&self) -> Result<u64> {
        u64::try_from(self.lock()?.len()).map_err(|_| Error::internal("record count overflow"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::record::tests::sample;
    use crate::record::RegistrationType;

    #[test]
    fn test_empty_store_reads_empty() {
        let store = MemoryStore::new();
        assert_eq!(store.read_all().unwrap(), LoadOutcome::Empty);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_append_preserves_order() {
        let store = MemoryStore::new();
        let records: Vec<_> = (0..5)
            .map(|i| sample(&format!("Person {i}"), "p@x.com", RegistrationType::Intern))
            .collect();

        for (i, r) in records.iter().enumerate() {
            assert_eq!(store.append(r).unwrap(), i as u64 + 1);
        }

        assert_eq!(store.read_all().unwrap(), LoadOutcome::Loaded(records));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let store = MemoryStore::new();
        let r = sample("Ada", "ada@x.com", RegistrationType::Volunteer);

        store.append(&r).unwrap();
        let err = store.append(&r).unwrap_err();

        assert!(err.is_duplicate_id());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_with_records() {
        let r = sample("Ada", "ada@x.com", RegistrationType::Volunteer);
        let store = MemoryStore::with_records(vec![r.clone()]);
        assert_eq!(store.read_all().unwrap(), LoadOutcome::Loaded(vec![r]));
    }

    #[test]
    fn test_concurrent_appends_lose_nothing() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..50 {
                        let r = sample(
                            &format!("T{t} #{i}"),
                            "t@x.com",
                            RegistrationType::Volunteer,
                        );
                        store.append(&r).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.count().unwrap(), 400);
    }
}
