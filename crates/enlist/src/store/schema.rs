//! Table and index definitions for the registration database.
//!
//! These make up schema version 1; see [`super::migrations`].

/// SQL statement to create the registrations table.
///
/// `seq` is the append order; `id` is the opaque record identifier.
pub const CREATE_REGISTRATIONS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS registrations (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT NOT NULL,
    registration_type TEXT NOT NULL,
    experience TEXT NOT NULL,
    availability TEXT NOT NULL,
    motivation TEXT NOT NULL,
    registered_at TEXT NOT NULL
)
";

/// SQL statement to create an index on `registration_type` for filtering.
pub const CREATE_TYPE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_registrations_type ON registrations(registration_type)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Statements of schema version 1, in execution order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_REGISTRATIONS_TABLE,
    CREATE_TYPE_INDEX,
    CREATE_METADATA_TABLE,
];
