//! Command-line interface for enlist.
//!
//! This module provides the CLI structure for the `enlist` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, ExportCommand, FilterArgs, ImportCommand, ListCommand, OutputFormat,
    RegisterCommand, StatsCommand, TypeFilterArg,
};

/// enlist - Volunteer and intern registrations
///
/// Collects registrations, lists and filters them, and exports them as CSV.
#[derive(Debug, Parser)]
#[command(name = "enlist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a new registration
    Register(RegisterCommand),

    /// List registrations
    List(ListCommand),

    /// Show registration counts
    Stats(StatsCommand),

    /// Export registrations as CSV
    Export(ExportCommand),

    /// Import registrations saved by the browser form
    Import(ImportCommand),

    /// Print every registration in the browser form's JSON layout
    Dump,

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}
