//! CSV export of registrations.
//!
//! Fields that contain the delimiter, a double quote or a line break are
//! quoted with embedded quotes doubled, so every record stays one row.

use std::path::Path;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::record::Registration;

/// Column headers of the export.
pub const CSV_HEADER: [&str; 7] = [
    "Name",
    "Email",
    "Phone",
    "Type",
    "Experience",
    "Availability",
    "Registered",
];

/// File name used when none is configured.
pub const EXPORT_FILE_NAME: &str = "registered_users.csv";

/// MIME type of the export.
pub const EXPORT_MIME_TYPE: &str = "text/csv";

/// Short US-style date, matching what browsers print for `en-US`.
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Time zone the Registered column is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportTimezone {
    /// The machine's local time zone.
    #[default]
    Local,
    /// UTC.
    Utc,
}

/// Export configuration options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// `strftime` format for the Registered column.
    pub date_format: String,
    /// Time zone for the Registered column.
    pub timezone: ExportTimezone,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            timezone: ExportTimezone::Local,
        }
    }
}

impl ExportOptions {
    /// Render dates in UTC.
    #[must_use]
    pub fn in_utc(mut self) -> Self {
        self.timezone = ExportTimezone::Utc;
        self
    }

    /// Use a different date format.
    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Render `at` as a Registered column value.
    #[must_use]
    pub fn format_date(&self, at: &DateTime<Utc>) -> String {
        match self.timezone {
            ExportTimezone::Local => at
                .with_timezone(&Local)
                .format(&self.date_format)
                .to_string(),
            ExportTimezone::Utc => at.format(&self.date_format).to_string(),
        }
    }
}

/// Quote a field if it contains a comma, quote, CR or LF.
#[must_use]
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn write_row<'f>(out: &mut String, fields: impl IntoIterator<Item = &'f str>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(field));
    }
}

/// Render records as CSV.
///
/// The header comes first, then one row per record in the given order.
/// Rows are joined by `\n` with no trailing newline.
#[must_use]
pub fn export_csv<'r>(
    records: impl IntoIterator<Item = &'r Registration>,
    options: &ExportOptions,
) -> String {
    let mut out = String::new();
    write_row(&mut out, CSV_HEADER);

    for record in records {
        out.push('\n');
        let registered = options.format_date(&record.registered_at);
        write_row(
            &mut out,
            [
                record.name.as_str(),
                record.email.as_str(),
                record.phone.as_str(),
                record.registration_type.as_str(),
                record.experience.as_str(),
                record.availability.as_str(),
                registered.as_str(),
            ],
        );
    }
    out
}

/// Write an export to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if a directory cannot be created or the file cannot be
/// written.
pub fn write_export(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    std::fs::write(path, contents)?;
    info!(path = %path.display(), bytes = contents.len(), "Wrote CSV export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::sample;
    use crate::record::RegistrationType;

    fn utc() -> ExportOptions {
        ExportOptions::default().in_utc()
    }

    #[test]
    fn test_header_only_for_no_records() {
        let csv = export_csv(&Vec::<Registration>::new(), &utc());
        assert_eq!(
            csv,
            "Name,Email,Phone,Type,Experience,Availability,Registered"
        );
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_one_row_per_record() {
        let records: Vec<_> = (0..4)
            .map(|i| sample(&format!("P{i}"), "p@x.com", RegistrationType::Intern))
            .collect();

        let csv = export_csv(&records, &utc());
        assert_eq!(csv.lines().count(), records.len() + 1);
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_row_contents() {
        let r = sample("Ada", "ada@x.com", RegistrationType::Volunteer);
        let csv = export_csv([&r], &utc());

        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "Ada,ada@x.com,555-0100,volunteer,some,weekdays,3/15/2024");
    }

    #[test]
    fn test_custom_date_format() {
        let r = sample("Ada", "ada@x.com", RegistrationType::Volunteer);
        let csv = export_csv([&r], &utc().with_date_format("%Y-%m-%d"));

        assert!(csv.ends_with(",2024-03-15"));
    }

    #[test]
    fn test_fields_with_delimiters_are_quoted() {
        let mut r = sample("Lovelace, Ada", "ada@x.com", RegistrationType::Volunteer);
        r.phone = "say \"hi\"".to_string();

        let csv = export_csv([&r], &utc());
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("\"Lovelace, Ada\",ada@x.com,\"say \"\"hi\"\"\","));
        assert_eq!(csv.lines().count(), 2);
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("a\"b"), "\"a\"\"b\"");
        assert_eq!(escape_field("a\nb"), "\"a\nb\"");
        assert_eq!(escape_field(""), "");
    }

    #[test]
    fn test_write_export_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join(EXPORT_FILE_NAME);

        write_export(&path, "Name\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Name\n");
    }

    #[test]
    fn test_export_constants() {
        assert_eq!(EXPORT_FILE_NAME, "registered_users.csv");
        assert_eq!(EXPORT_MIME_TYPE, "text/csv");
    }
}
