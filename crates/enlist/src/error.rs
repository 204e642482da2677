//! Error types for enlist.
//!
//! This module defines all error types used throughout the enlist crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The main error type for enlist operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// A record with this id is already stored.
    #[error("a registration with id '{id}' already exists")]
    DuplicateId {
        /// The conflicting id.
        id: String,
    },

    /// Stored registrations could not be decoded.
    #[error("stored registrations are unreadable: {reason}")]
    StoreUnreadable {
        /// Why decoding failed.
        reason: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Form Errors ===
    /// The submitted registration is incomplete or malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for enlist operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create an unreadable-store error.
    #[must_use]
    pub fn store_unreadable(reason: impl Into<String>) -> Self {
        Self::StoreUnreadable {
            reason: reason.into(),
        }
    }

    /// Check if this error is a form validation failure.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error reports a duplicate record id.
    #[must_use]
    pub fn is_duplicate_id(&self) -> bool {
        matches!(self, Self::DuplicateId { .. })
    }
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Form field name (`name`, `email`, `type`, ...).
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

/// Every field that failed validation, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
pub struct ValidationError {
    /// The violated fields.
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    /// Record a violation.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// True when no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names of the failing fields.
    #[must_use]
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.field).collect()
    }

    /// Whether `field` is among the failures.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid registration: ")?;
        for (i, err) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{} {}", err.field, err.message)?;
        }
        Ok(())
    }
}
