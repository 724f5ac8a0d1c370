//! Error types for store mutations and derived-file generation.

use thiserror::Error;

use crate::config::{PersistError, RenderError};
use crate::filter::IdsExhausted;

/// Error from a guarded mutation of the configuration.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A filter with this URL is already configured.
    #[error("Filter '{0}' is already configured")]
    DuplicateUrl(String),

    /// No filter has this URL.
    #[error("No filter with URL '{0}'")]
    UnknownUrl(String),

    /// No filter has this identifier.
    #[error("No filter with id {0}")]
    UnknownId(i64),

    /// No identifier is left for a new filter.
    #[error(transparent)]
    Ids(#[from] IdsExhausted),
}

/// Error writing the configuration together with its derived files.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Writing the configuration or a filter file failed.
    #[error(transparent)]
    Persist(#[from] PersistError),

    /// Rendering the resolver config failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}
