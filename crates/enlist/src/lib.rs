//! `enlist` - Volunteer and intern registrations
//!
//! This library provides the registration record, the append-only record
//! stores, the registration form, the admin view with its filters and
//! statistics, and CSV export.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod admin;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod form;
pub mod logging;
pub mod record;
pub mod store;

pub use admin::{AdminView, RegistrationStats, TypeFilter};
pub use config::Config;
pub use error::{Error, Result};
pub use export::{export_csv, write_export, ExportOptions};
pub use form::{Confirmation, RegistrationDraft, RegistrationForm};
pub use logging::init_logging;
pub use record::{Availability, Experience, Registration, RegistrationType};
pub use store::{open_store, LoadOutcome, MemoryStore, ReadPolicy, RecordStore, SqliteStore};
