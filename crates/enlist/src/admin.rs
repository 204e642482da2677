//! Admin view over stored registrations.
//!
//! The view reads the store once when it is loaded and works on that
//! snapshot from then on. Records appended afterwards only show up in a
//! freshly loaded view.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::export::{export_csv, ExportOptions};
use crate::record::{Registration, RegistrationType, UnknownVariant};
use crate::store::{ReadPolicy, RecordStore};

/// Shown when nothing has been registered at all.
pub const NO_REGISTRATIONS_MESSAGE: &str =
    "No users have registered yet. Encourage people to sign up!";

/// Shown when registrations exist but none match the filters.
pub const NO_MATCHES_MESSAGE: &str = "No users match your current search criteria.";

/// Registration type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    /// Every type.
    #[default]
    All,
    /// Only one type.
    Only(RegistrationType),
}

impl TypeFilter {
    /// Whether `kind` passes the filter.
    #[must_use]
    pub fn accepts(self, kind: RegistrationType) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == kind,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(kind) => f.write_str(kind.as_str()),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<RegistrationType>()
            .map(Self::Only)
            .map_err(|_| UnknownVariant {
                kind: "type filter",
                value: s.to_string(),
            })
    }
}

/// Headline counts over every loaded registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RegistrationStats {
    /// All registrations.
    pub total: usize,
    /// Volunteers.
    pub volunteers: usize,
    /// Interns.
    pub interns: usize,
}

/// Loaded registrations plus the current search and type filter.
#[derive(Debug, Clone, Default)]
pub struct AdminView {
    records: Vec<Registration>,
    search: String,
    type_filter: TypeFilter,
}

impl AdminView {
    /// Read every record from `store` once.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails, or if its data is unreadable
    /// under [`ReadPolicy::Strict`].
    pub fn load(store: &dyn RecordStore, policy: ReadPolicy) -> Result<Self> {
        let records = store.read_with(policy)?;
        debug!(count = records.len(), store = store.name(), "Loaded registrations");
        Ok(Self::from_records(records))
    }

    /// A view over an already loaded list.
    #[must_use]
    pub fn from_records(records: Vec<Registration>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// Every loaded record, in insertion order.
    #[must_use]
    pub fn records(&self) -> &[Registration] {
        &self.records
    }

    /// The current search text.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Set the search text matched against name and email.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// The current type filter.
    #[must_use]
    pub fn type_filter(&self) -> TypeFilter {
        self.type_filter
    }

    /// Set the type filter.
    pub fn set_type_filter(&mut self, filter: TypeFilter) {
        self.type_filter = filter;
    }

    /// Records matching both the search text and the type filter.
    ///
    /// Insertion order is preserved.
    #[must_use]
    pub fn filtered(&self) -> Vec<&Registration> {
        self.records
            .iter()
            .filter(|r| self.type_filter.accepts(r.registration_type))
            .filter(|r| r.matches_search(&self.search))
            .collect()
    }

    /// Counts over every loaded record, ignoring the filters.
    #[must_use]
    pub fn stats(&self) -> RegistrationStats {
        let count = |kind: RegistrationType| {
            self.records
                .iter()
                .filter(|r| r.registration_type == kind)
                .count()
        };
        RegistrationStats {
            total: self.records.len(),
            volunteers: count(RegistrationType::Volunteer),
            interns: count(RegistrationType::Intern),
        }
    }

    /// Message to show when the filtered list is empty, `None` otherwise.
    #[must_use]
    pub fn empty_message(&self) -> Option<&'static str> {
        if self.records.is_empty() {
            Some(NO_REGISTRATIONS_MESSAGE)
        } else if self.filtered().is_empty() {
            Some(NO_MATCHES_MESSAGE)
        } else {
            None
        }
    }

    /// CSV export of the filtered list.
    #[must_use]
    pub fn export_csv(&self, options: &ExportOptions) -> String {
        export_csv(self.filtered(), options)
    }
}
