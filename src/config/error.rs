//! Error types for loading, persisting, and rendering configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::filter::IdsExhausted;

/// Error loading the persisted configuration.
///
/// A missing file is not an error; see [`crate::store::LoadOutcome::NotFound`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// The configuration file exists but could not be read.
    #[error("Failed to read config file '{}': {source}", path.display())]
    Read {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not a valid document.
    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        /// Path to the config file
        path: PathBuf,
        /// Underlying YAML error
        #[source]
        source: serde_yaml::Error,
    },

    /// The document was written by a newer build.
    #[error("Unsupported schema version {found}: this build understands up to {supported}")]
    UnsupportedSchema {
        /// Version found in the document
        found: u32,
        /// Newest version this build can read
        supported: u32,
    },

    /// Repairing the document's filter identifiers ran out of identifiers.
    #[error("Failed to assign filter identifiers: {0}")]
    Ids(#[from] IdsExhausted),
}

/// Error writing the configuration or a filter contents file.
///
/// Files written before the failure are left in place; callers retry the
/// whole save.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Failed to serialize the configuration.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] serde_yaml::Error),

    /// Failed to write a file.
    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Error rendering the resolver configuration.
///
/// Never expected for well-formed input; seeing one indicates a bug.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing into the output buffer failed.
    #[error("Failed to format resolver config: {0}")]
    Format(#[from] std::fmt::Error),

    /// The blank-line pattern failed to compile.
    #[error("Invalid blank-line pattern: {0}")]
    Pattern(#[from] regex::Error),
}
