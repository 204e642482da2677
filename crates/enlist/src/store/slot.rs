//! Codec for the browser's local-storage layout.
//!
//! The web front end kept every registration as one JSON array under the
//! `registeredUsers` key. These helpers decode such a dump into a
//! [`LoadOutcome`], encode records back into it, and import a dump into any
//! [`RecordStore`].

use tracing::{info, warn};

use super::{LoadOutcome, RecordStore};
use crate::error::{Error, Result};
use crate::record::Registration;

/// Local-storage key the browser front end used.
pub const SLOT_KEY: &str = "registeredUsers";

/// Decode a slot value.
///
/// Blank input and `null` (an absent key) decode as [`LoadOutcome::Empty`].
/// Anything that is not a JSON array of well-formed records is
/// [`LoadOutcome::Unreadable`].
#[must_use]
pub fn decode_slot(text: &str) -> LoadOutcome {
    if text.trim().is_empty() {
        return LoadOutcome::Empty;
    }
    match serde_json::from_str::<Option<Vec<Registration>>>(text) {
        Ok(Some(records)) => LoadOutcome::from_records(records),
        Ok(None) => LoadOutcome::Empty,
        Err(e) => LoadOutcome::Unreadable {
            reason: format!("{SLOT_KEY}: {e}"),
        },
    }
}

/// Encode records as a slot value.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_slot(records: &[Registration]) -> Result<String> {
    Ok(serde_json::to_string(records)?)
}

/// Counts from an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    /// Records appended to the store.
    pub imported: usize,
    /// Records skipped because their id was already stored.
    pub duplicates: usize,
}

/// Append every record of a slot value to `store`, in order.
///
/// Records whose id is already stored are skipped, so importing the same
/// dump twice is harmless.
///
/// # Errors
///
/// Returns [`Error::StoreUnreadable`] if `text` cannot be decoded, or any
/// store error other than a duplicate id.
pub fn import_slot(store: &dyn RecordStore, text: &str) -> Result<ImportSummary> {
    let records = match decode_slot(text) {
        LoadOutcome::Empty => Vec::new(),
        LoadOutcome::Loaded(records) => records,
        LoadOutcome::Unreadable { reason } => return Err(Error::StoreUnreadable { reason }),
    };

    let mut summary = ImportSummary::default();
    for record in &records {
        match store.append(record) {
            Ok(_) => summary.imported += 1,
            Err(Error::DuplicateId { id }) => {
                warn!(%id, "Skipping registration that is already stored");
                summary.duplicates += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        imported = summary.imported,
        duplicates = summary.duplicates,
        store = store.name(),
        "Imported browser registrations"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::sample;
    use crate::record::RegistrationType;
    use crate::store::MemoryStore;

    const BROWSER_DUMP: &str = r#"[
        {"name":"Ada","email":"ada@x.com","phone":"1","type":"volunteer",
         "experience":"some","availability":"weekdays","motivation":"m",
         "id":"1718000000000","registeredAt":"2024-06-10T06:13:20.000Z"},
        {"name":"Grace","email":"grace@x.com","phone":"2","type":"intern",
         "experience":"none","availability":"part-time","motivation":"n",
         "id":"1718000000500","registeredAt":"2024-06-10T06:13:20.500Z"}
    ]"#;

    #[test]
    fn test_decode_blank_and_null() {
        assert_eq!(decode_slot(""), LoadOutcome::Empty);
        assert_eq!(decode_slot("  \n"), LoadOutcome::Empty);
        assert_eq!(decode_slot("null"), LoadOutcome::Empty);
        assert_eq!(decode_slot("[]"), LoadOutcome::Empty);
    }

    #[test]
    fn test_decode_browser_dump() {
        let outcome = decode_slot(BROWSER_DUMP);
        assert_eq!(outcome.len(), 2);
        match outcome {
            LoadOutcome::Loaded(records) => {
                assert_eq!(records[0].name, "Ada");
                assert_eq!(records[1].registration_type, RegistrationType::Intern);
            }
            other => panic!("expected loaded, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_malformed_is_unreadable() {
        assert!(decode_slot("{not json").is_unreadable());
        assert!(decode_slot(r#"{"name":"Ada"}"#).is_unreadable());
        assert!(decode_slot(r#"[{"name":"Ada"}]"#).is_unreadable());
    }

    #[test]
    fn test_encode_then_decode() {
        let records = vec![
            sample("Ada", "ada@x.com", RegistrationType::Volunteer),
            sample("Grace", "grace@x.com", RegistrationType::Intern),
        ];
        let text = encode_slot(&records).unwrap();

        assert!(text.starts_with('['));
        assert!(text.contains("\"registeredAt\""));
        assert_eq!(decode_slot(&text), LoadOutcome::Loaded(records));
    }

    #[test]
    fn test_import_into_store() {
        let store = MemoryStore::new();
        let summary = import_slot(&store, BROWSER_DUMP).unwrap();

        assert_eq!(
            summary,
            ImportSummary {
                imported: 2,
                duplicates: 0
            }
        );
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_import_twice_skips_duplicates() {
        let store = MemoryStore::new();
        import_slot(&store, BROWSER_DUMP).unwrap();
        let summary = import_slot(&store, BROWSER_DUMP).unwrap();

        assert_eq!(summary.imported, 0);
        assert_eq!(summary.duplicates, 2);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_import_malformed_fails() {
        let store = MemoryStore::new();
        let err = import_slot(&store, "[{]").unwrap_err();
        assert!(matches!(err, Error::StoreUnreadable { .. }));
        assert_eq!(store.count().unwrap(), 0);
    }
}
