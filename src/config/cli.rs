//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::store::StorePaths;

/// dnsguard: DNS filtering configuration manager
///
/// Keeps the filtering service's settings and regenerates the
/// resolver's Corefile from them.
#[derive(Debug, Parser)]
#[command(name = "dnsguard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the configuration, data, and Corefile
    #[arg(long = "work-dir", short = 'w', default_value = ".", global = true)]
    pub work_dir: PathBuf,

    /// Configuration file name, relative to the working directory
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for dnsguard
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write the default configuration file
    Init,

    /// Load the configuration and rewrite every derived file
    Sync,

    /// Print the resolver config to stdout
    Render,

    /// Print the filter list as JSON
    Status,

    /// Add a filter source
    AddFilter {
        /// Filter list URL
        #[arg(long)]
        url: String,

        /// Human-readable name
        #[arg(long)]
        name: String,

        /// Add the filter disabled
        #[arg(long)]
        disabled: bool,
    },

    /// Remove a filter source
    RemoveFilter {
        /// Filter list URL
        #[arg(long)]
        url: String,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Resolves the store locations from the arguments.
    #[must_use]
    pub fn store_paths(&self) -> StorePaths {
        let paths = StorePaths::new(&self.work_dir);
        match &self.config {
            Some(name) => paths.with_config_file(name),
            None => paths,
        }
    }

    /// Returns true if the command writes the configuration files.
    #[must_use]
    pub const fn writes_files(&self) -> bool {
        matches!(
            self.command,
            Command::Init
                | Command::Sync
                | Command::AddFilter { .. }
                | Command::RemoveFilter { .. }
        )
    }
}
