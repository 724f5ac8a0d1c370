//! On-disk locations used by the store.

use std::path::{Path, PathBuf};

use crate::config::defaults;

/// Every file location derived from one working directory.
///
/// - `<work_dir>/dnsguard.yaml`: main configuration
/// - `<work_dir>/data/filters/<id>.txt`: filter contents
/// - `<work_dir>/Corefile`: rendered resolver config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    work_dir: PathBuf,
    config_file: PathBuf,
    filters_dir: PathBuf,
    resolver_config_file: PathBuf,
}

impl StorePaths {
    /// Creates the default layout under `work_dir`.
    #[must_use]
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        let work_dir = work_dir.into();
        Self {
            config_file: work_dir.join(defaults::CONFIG_FILE_NAME),
            filters_dir: work_dir.join(defaults::DATA_DIR).join(defaults::FILTER_DIR),
            resolver_config_file: work_dir.join(defaults::RESOLVER_CONFIG_FILE_NAME),
            work_dir,
        }
    }

    /// Overrides the configuration file; relative paths resolve against the working directory.
    #[must_use]
    pub fn with_config_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_file = self.work_dir.join(path);
        self
    }

    /// Overrides the resolver config file; relative paths resolve against the working directory.
    #[must_use]
    pub fn with_resolver_config_file(mut self, path: impl AsRef<Path>) -> Self {
        self.resolver_config_file = self.work_dir.join(path);
        self
    }

    #[must_use]
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    #[must_use]
    pub fn filters_dir(&self) -> &Path {
        &self.filters_dir
    }

    #[must_use]
    pub fn resolver_config_file(&self) -> &Path {
        &self.resolver_config_file
    }
}
