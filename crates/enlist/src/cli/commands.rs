//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::admin::TypeFilter;
use crate::form::FormField;
use crate::record::RegistrationType;

/// Register command arguments.
///
/// Every field is optional here so that the form can report all missing
/// fields at once.
#[derive(Debug, Default, Args)]
pub struct RegisterCommand {
    /// Full name
    #[arg(long)]
    pub name: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Registration type (volunteer, intern)
    #[arg(long = "type", value_name = "TYPE")]
    pub registration_type: Option<String>,

    /// Previous experience (none, some, experienced)
    #[arg(long)]
    pub experience: Option<String>,

    /// Availability (weekdays, weekends, flexible, part-time, full-time)
    #[arg(long)]
    pub availability: Option<String>,

    /// Why you want to join
    #[arg(long)]
    pub motivation: Option<String>,
}

impl RegisterCommand {
    /// The supplied values paired with their form field, in form order.
    #[must_use]
    pub fn fields(&self) -> Vec<(FormField, &str)> {
        [
            (FormField::Name, &self.name),
            (FormField::Email, &self.email),
            (FormField::Phone, &self.phone),
            (FormField::Type, &self.registration_type),
            (FormField::Experience, &self.experience),
            (FormField::Availability, &self.availability),
            (FormField::Motivation, &self.motivation),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

/// Filters shared by `list` and `export`.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Only records whose name or email contains this text (case-insensitive)
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Only records of this type
    #[arg(short = 't', long = "type", value_enum, default_value = "all")]
    pub type_filter: TypeFilterArg,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Search and type filters
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Search and type filters
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output file, or `-` for stdout. Defaults to the configured file name.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Import command arguments.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// JSON array of registrations as saved by the browser form
    pub file: PathBuf,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Registration type argument for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TypeFilterArg {
    /// Every registration
    #[default]
    All,
    /// Volunteers only
    Volunteer,
    /// Interns only
    Intern,
}

impl From<TypeFilterArg> for TypeFilter {
    fn from(arg: TypeFilterArg) -> Self {
        match arg {
            TypeFilterArg::All => Self::All,
            TypeFilterArg::Volunteer => Self::Only(RegistrationType::Volunteer),
            TypeFilterArg::Intern => Self::Only(RegistrationType::Intern),
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_filter_arg_conversion() {
        assert_eq!(TypeFilter::from(TypeFilterArg::All), TypeFilter::All);
        assert_eq!(
            TypeFilter::from(TypeFilterArg::Volunteer),
            TypeFilter::Only(RegistrationType::Volunteer)
        );
        assert_eq!(
            TypeFilter::from(TypeFilterArg::Intern),
            TypeFilter::Only(RegistrationType::Intern)
        );
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_register_fields_skip_missing() {
        let cmd = RegisterCommand {
            name: Some("Ada".to_string()),
            registration_type: Some("intern".to_string()),
            ..RegisterCommand::default()
        };

        assert_eq!(
            cmd.fields(),
            vec![(FormField::Name, "Ada"), (FormField::Type, "intern")]
        );
    }

    #[test]
    fn test_register_fields_empty() {
        assert!(RegisterCommand::default().fields().is_empty());
    }

    #[test]
    fn test_filter_args_default() {
        let args = FilterArgs::default();
        assert!(args.search.is_empty());
        assert_eq!(args.type_filter, TypeFilterArg::All);
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }

    #[test]
    fn test_output_format_debug() {
        let format = OutputFormat::Json;
        let debug_str = format!("{format:?}");
        assert_eq!(debug_str, "Json");
    }
}
