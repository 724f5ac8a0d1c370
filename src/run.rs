//! Command execution.
//!
//! Each command loads the configuration, applies its change, and writes
//! back whatever it touched. Output goes to the supplied writer so the
//! commands can be exercised in tests.

use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use dnsguard::config::{Cli, Command, FilterEntry, LoadError};
use dnsguard::store::{ConfigStore, LoadOutcome, StoreError, SyncError};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for command failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to load the configuration.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] LoadError),

    /// Failed to write the configuration or its derived files.
    #[error("Failed to write configuration files: {0}")]
    Sync(#[from] SyncError),

    /// The requested change was rejected.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// `init` found an existing configuration file.
    #[error("Configuration file '{}' already exists", .0.display())]
    AlreadyInitialized(PathBuf),

    /// Failed to write command output.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// Failed to encode the filter list.
    #[error("Failed to encode filter list: {0}")]
    Json(#[from] serde_json::Error),
}

impl RunError {
    /// Returns `true` if a file could not be written.
    #[must_use]
    pub const fn is_write_failure(&self) -> bool {
        matches!(self, Self::Sync(_))
    }
}

/// JSON view of a filter for `status`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FilterStatus<'a> {
    id: i64,
    enabled: bool,
    url: &'a str,
    name: &'a str,
    rules_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_updated: Option<DateTime<Utc>>,
}

impl<'a> From<&'a FilterEntry> for FilterStatus<'a> {
    fn from(filter: &'a FilterEntry) -> Self {
        Self {
            id: filter.id,
            enabled: filter.enabled,
            url: &filter.url,
            name: &filter.name,
            rules_count: filter.rules_count,
            last_updated: filter.last_updated,
        }
    }
}

/// Executes the command selected on the command line.
///
/// # Errors
///
/// Returns the first failure; nothing is retried.
pub fn execute(cli: &Cli, out: &mut impl Write) -> Result<(), RunError> {
    let store = ConfigStore::new(cli.store_paths());
    let save_repairs = !cli.writes_files();

    match &cli.command {
        Command::Init => init(&store, out)?,
        Command::Sync => {
            load(&store, save_repairs)?;
            store.write_all()?;
            writeln!(
                out,
                "Wrote {}",
                store.paths().resolver_config_file().display()
            )?;
        }
        Command::Render => {
            load(&store, save_repairs)?;
            let text = store.render().map_err(SyncError::from)?;
            out.write_all(text.as_bytes())?;
        }
        Command::Status => {
            load(&store, save_repairs)?;
            let filters = store.read(|config| {
                let view: Vec<FilterStatus<'_>> =
                    config.filters.iter().map(FilterStatus::from).collect();
                serde_json::to_string_pretty(&view)
            })?;
            writeln!(out, "{filters}")?;
        }
        Command::AddFilter {
            url,
            name,
            disabled,
        } => {
            load(&store, save_repairs)?;
            let added = store.add_filter(url.as_str(), name.as_str(), !disabled)?;
            store.write_all()?;
            writeln!(out, "Added filter {} ({})", added.id, added.url)?;
        }
        Command::RemoveFilter { url } => {
            load(&store, save_repairs)?;
            let removed = store.remove_filter(url)?;
            store.write_all()?;
            writeln!(out, "Removed filter {} ({})", removed.id, removed.url)?;
        }
    }

    Ok(())
}

/// Loads the configuration and the cached filter contents.
///
/// With `save_repairs`, a document that load had to change (duplicates
/// dropped, identifiers repaired, schema upgraded) is written back so the
/// identifiers shown stay stable across runs. Commands that write the
/// configuration themselves pass `false`.
fn load(store: &ConfigStore, save_repairs: bool) -> Result<(), RunError> {
    let outcome = store.load()?;
    if let LoadOutcome::Loaded {
        duplicates_dropped,
        ids_reassigned,
        upgraded_from,
    } = outcome
    {
        tracing::debug!(
            duplicates_dropped,
            ids_reassigned,
            ?upgraded_from,
            "Loaded configuration"
        );
    }
    if save_repairs && outcome.needs_save() {
        tracing::info!(
            path = %store.paths().config_file().display(),
            "Saving repaired configuration"
        );
        store.save().map_err(SyncError::from)?;
    }
    let cached = store.load_filter_contents()?;
    tracing::debug!(cached, "Read cached filter contents");
    Ok(())
}

/// Writes the built-in defaults unless a configuration file exists.
fn init(store: &ConfigStore, out: &mut impl Write) -> Result<(), RunError> {
    let path = store.paths().config_file();
    if path.exists() {
        return Err(RunError::AlreadyInitialized(path.to_path_buf()));
    }

    store.write_all()?;
    writeln!(out, "Configuration written to: {}", path.display())?;
    Ok(())
}
