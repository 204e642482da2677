//! `enlist` - CLI for volunteer and intern registrations
//!
//! This binary submits registrations, shows the admin listing and statistics,
//! and exports or migrates the stored records.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use enlist::cli::{
    Cli, Command, ConfigCommand, ExportCommand, FilterArgs, ListCommand, OutputFormat,
    RegisterCommand,
};
use enlist::store::slot::{encode_slot, import_slot};
use enlist::{init_logging, open_store, write_export, AdminView, Config, RecordStore};
use enlist::{RegistrationForm, RegistrationStats};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;
    debug!(backend = ?config.storage.backend, "Configuration loaded");

    let store = match &cli.command {
        Command::Config(cmd) => return handle_config(&config, cmd),
        _ => open_store(&config)?,
    };
    let store = store.as_ref();

    match &cli.command {
        Command::Register(cmd) => handle_register(store, cmd),
        Command::List(cmd) => handle_list(&config, store, cmd),
        Command::Stats(cmd) => handle_stats(&config, store, cmd.json),
        Command::Export(cmd) => handle_export(&config, store, cmd),
        Command::Import(cmd) => handle_import(store, &cmd.file),
        Command::Dump => handle_dump(&config, store),
        Command::Config(_) => Ok(()),
    }
}

fn handle_register(store: &dyn RecordStore, cmd: &RegisterCommand) -> Result<()> {
    let mut form = RegistrationForm::new(store);

    form.draft_mut().fill(cmd.fields()).map_err(enlist::Error::from)?;

    let confirmation = form.submit()?;
    println!("{confirmation}");
    Ok(())
}

fn load_view(config: &Config, store: &dyn RecordStore, filter: &FilterArgs) -> Result<AdminView> {
    let mut view = AdminView::load(store, config.storage.read_policy)?;
    view.set_search(filter.search.clone());
    view.set_type_filter(filter.type_filter.into());
    Ok(view)
}

fn handle_list(config: &Config, store: &dyn RecordStore, cmd: &ListCommand) -> Result<()> {
    let view = load_view(config, store, &cmd.filter)?;
    let records = view.filtered();

    if cmd.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if let Some(message) = view.empty_message() {
        println!("{message}");
        return Ok(());
    }

    let dates = config.export_options();
    match cmd.format {
        OutputFormat::Plain => {
            for r in &records {
                println!(
                    "{} <{}> {} ({})",
                    r.name,
                    r.email,
                    r.registration_type,
                    dates.format_date(&r.registered_at)
                );
            }
        }
        OutputFormat::Table => {
            println!(
                "{:<24} {:<28} {:<14} {:<10} {:<12} {:<12} {}",
                "Name", "Email", "Phone", "Type", "Experience", "Availability", "Registered"
            );
            println!("{}", "-".repeat(114));
            for r in &records {
                println!(
                    "{:<24} {:<28} {:<14} {:<10} {:<12} {:<12} {}",
                    r.name,
                    r.email,
                    r.phone,
                    r.registration_type.label(),
                    r.experience.as_str(),
                    r.availability.as_str(),
                    dates.format_date(&r.registered_at)
                );
            }
        }
        OutputFormat::Json => {}
    }
    Ok(())
}

fn handle_stats(config: &Config, store: &dyn RecordStore, json: bool) -> Result<()> {
    let view = AdminView::load(store, config.storage.read_policy)?;
    let stats = view.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        let RegistrationStats {
            total,
            volunteers,
            interns,
        } = stats;
        println!("Total Registrations: {total}");
        println!("Volunteers:          {volunteers}");
        println!("Interns:             {interns}");
    }
    Ok(())
}

fn handle_export(config: &Config, store: &dyn RecordStore, cmd: &ExportCommand) -> Result<()> {
    let view = load_view(config, store, &cmd.filter)?;
    let csv = view.export_csv(&config.export_options());

    let path = cmd
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.export.file_name));

    if path.as_os_str() == "-" {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(csv.as_bytes())?;
        stdout.flush()?;
        return Ok(());
    }

    write_export(&path, &csv)?;
    println!(
        "Exported {} registrations to {}",
        view.filtered().len(),
        path.display()
    );
    Ok(())
}

fn handle_import(store: &dyn RecordStore, file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let summary = import_slot(store, &text)?;

    println!(
        "Imported {} registrations ({} already present)",
        summary.imported, summary.duplicates
    );
    Ok(())
}

fn handle_dump(config: &Config, store: &dyn RecordStore) -> Result<()> {
    let records = store.read_with(config.storage.read_policy)?;
    println!("{}", encode_slot(&records)?);
    Ok(())
}

fn handle_config(config: &Config, cmd: &ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Backend:            {:?}", config.storage.backend);
                println!("  Database path:      {}", config.database_path().display());
                println!("  Read policy:        {:?}", config.storage.read_policy);
                println!("  Busy timeout (ms):  {}", config.storage.busy_timeout_ms);
                println!();
                println!("[Export]");
                println!("  File name:          {}", config.export.file_name);
                println!("  Date format:        {}", config.export.date_format);
                println!("  Timezone:           {:?}", config.export.timezone);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.clone().unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path)).context("configuration is invalid")?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
