//! Shared configuration store.
//!
//! [`ConfigStore`] owns the single [`Configuration`] instance behind a
//! reader/writer lock, the filter identifier counter, and the file
//! locations. Every collaborator receives the store by reference; there is
//! no global state.
//!
//! # Locking
//!
//! - Single reads go through [`ConfigStore::read`] (shared lock).
//! - Mutations and read-then-write sequences take the exclusive lock for
//!   their whole duration.
//! - Operations that write files hold the exclusive lock while writing, so
//!   they see a consistent snapshot and never race on temp files.
//!
//! Identifier assignment uses an atomic counter and does not need the lock.

mod error;
mod file;
mod paths;
mod upgrade;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use error::{StoreError, SyncError};
pub use file::{read_optional, write_atomic};
pub use paths::StorePaths;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::{Configuration, FilterEntry, LoadError, PersistError, RenderError};
use crate::filter::{Deduplicated, FilterIdAllocator, dedupe, user_filter};
use crate::render;

/// Result of [`ConfigStore::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No configuration file exists; built-in defaults remain in effect.
    NotFound,

    /// The configuration file was read and applied.
    Loaded {
        /// Later entries dropped because their URL repeated.
        duplicates_dropped: usize,
        /// Entries whose identifier was invalid or repeated and got a fresh one.
        ids_reassigned: usize,
        /// Schema version of the document, if it had to be upgraded.
        upgraded_from: Option<u32>,
    },
}

impl LoadOutcome {
    /// Returns `true` if a configuration file was applied.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    /// Returns `true` if the in-memory state differs from the file that was read.
    #[must_use]
    pub const fn needs_save(&self) -> bool {
        match self {
            Self::NotFound => false,
            Self::Loaded {
                duplicates_dropped,
                ids_reassigned,
                upgraded_from,
            } => *duplicates_dropped > 0 || *ids_reassigned > 0 || upgraded_from.is_some(),
        }
    }
}

/// Owner of the shared configuration.
#[derive(Debug)]
pub struct ConfigStore {
    paths: StorePaths,
    config: RwLock<Configuration>,
    ids: FilterIdAllocator,
}

impl ConfigStore {
    /// Creates a store holding the built-in defaults.
    #[must_use]
    pub fn new(paths: StorePaths) -> Self {
        Self::with_config(paths, Configuration::default())
    }

    /// Creates a store holding `config`.
    ///
    /// The identifier counter starts at the wall clock and is moved past
    /// every identifier in `config`.
    #[must_use]
    pub fn with_config(paths: StorePaths, config: Configuration) -> Self {
        let ids = FilterIdAllocator::from_clock();
        ids.seed(&config.filters);
        Self {
            paths,
            config: RwLock::new(config),
            ids,
        }
    }

    /// Returns the file locations.
    #[must_use]
    pub const fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Runs `f` with shared access to the configuration.
    pub fn read<R>(&self, f: impl FnOnce(&Configuration) -> R) -> R {
        f(&self.read_lock())
    }

    /// Runs `f` with exclusive access to the configuration.
    pub fn update<R>(&self, f: impl FnOnce(&mut Configuration) -> R) -> R {
        f(&mut self.write_lock())
    }

    /// Returns a deep copy of the configuration.
    #[must_use]
    pub fn snapshot(&self) -> Configuration {
        self.read_lock().clone()
    }

    /// Loads the configuration file, replacing the in-memory settings.
    ///
    /// A missing file keeps the current settings and is not an error. After
    /// a successful read, duplicate filter URLs are dropped (first one wins),
    /// the identifier counter is seeded, and older schemas are upgraded.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the file exists but cannot be read or parsed,
    /// was written by a newer schema, or its identifiers cannot be repaired.
    pub fn load(&self) -> Result<LoadOutcome, LoadError> {
        let path = self.paths.config_file();
        info!(path = %path.display(), "Reading config file");

        let bytes = read_optional(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let Some(bytes) = bytes else {
            info!(path = %path.display(), "Config file doesn't exist, keeping defaults");
            return Ok(LoadOutcome::NotFound);
        };

        let mut loaded: Configuration =
            serde_yaml::from_slice(&bytes).map_err(|source| LoadError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        upgrade::check_supported(loaded.schema_version)?;

        let mut config = self.write_lock();
        loaded.resolver.keep_fragments_from(&config.resolver);

        let Deduplicated { kept, dropped } = dedupe(std::mem::take(&mut loaded.filters));
        for duplicate in &dropped {
            warn!(url = %duplicate.url, id = duplicate.id, "Dropped duplicate filter");
        }
        loaded.filters = kept;

        self.ids.seed(&loaded.filters);
        let upgraded_from = upgrade::upgrade(&mut loaded, &self.ids)?;
        let ids_reassigned = self.ids.reassign_conflicts(&mut loaded.filters)?;
        if ids_reassigned > 0 {
            warn!(count = ids_reassigned, "Reassigned conflicting filter ids");
        }

        *config = loaded;
        Ok(LoadOutcome::Loaded {
            duplicates_dropped: dropped.len(),
            ids_reassigned,
            upgraded_from,
        })
    }

    /// Writes the configuration file, then the user rules file.
    ///
    /// The two writes are not transactional: if the second fails the first
    /// stays written. In-memory state is never changed, so retrying is safe.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] for the first write that fails.
    pub fn save(&self) -> Result<(), PersistError> {
        let config = self.write_lock();

        let path = self.paths.config_file();
        info!(path = %path.display(), "Writing config file");
        let yaml = serde_yaml::to_string(&*config).map_err(PersistError::Serialize)?;
        write_atomic(path, yaml.as_bytes())?;

        let user = user_filter(&config.user_rules);
        let user_path = user.path(self.paths.filters_dir());
        debug!(path = %user_path.display(), rules = user.rules_count, "Writing user rules");
        write_atomic(&user_path, user.contents.as_deref().unwrap_or_default())?;

        Ok(())
    }

    /// Renders the resolver config from the current settings.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] only on internal failure.
    pub fn render(&self) -> Result<String, RenderError> {
        let config = self.read_lock();
        render::render(
            &config.resolver,
            &config.filters,
            &config.user_rules,
            self.paths.filters_dir(),
        )
    }

    /// Renders the resolver config and writes it to its file.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if rendering or writing fails.
    pub fn write_resolver_config(&self) -> Result<(), SyncError> {
        let config = self.write_lock();
        let path = self.paths.resolver_config_file();
        info!(path = %path.display(), "Writing resolver config");

        let text = render::render(
            &config.resolver,
            &config.filters,
            &config.user_rules,
            self.paths.filters_dir(),
        )?;
        write_atomic(path, text.as_bytes())?;
        Ok(())
    }

    /// Saves the configuration and rewrites the resolver config.
    ///
    /// # Errors
    ///
    /// Returns the first failure; later steps are skipped.
    pub fn write_all(&self) -> Result<(), SyncError> {
        self.save()?;
        self.write_resolver_config()
    }

    /// Appends a new filter with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateUrl`] if the URL is already configured,
    /// or [`StoreError::Ids`] if no identifier is left.
    pub fn add_filter(
        &self,
        url: impl Into<String>,
        name: impl Into<String>,
        enabled: bool,
    ) -> Result<FilterEntry, StoreError> {
        let url = url.into();
        let mut config = self.write_lock();
        if config.filters.iter().any(|f| f.url == url) {
            return Err(StoreError::DuplicateUrl(url));
        }

        let filter = FilterEntry::new(self.ids.next()?, url, name, enabled);
        info!(url = %filter.url, id = filter.id, "Added filter");
        config.filters.push(filter.clone());
        Ok(filter)
    }

    /// Removes the filter with `url`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownUrl`] if no filter has that URL.
    pub fn remove_filter(&self, url: &str) -> Result<FilterEntry, StoreError> {
        let mut config = self.write_lock();
        let index = config
            .filters
            .iter()
            .position(|f| f.url == url)
            .ok_or_else(|| StoreError::UnknownUrl(url.to_string()))?;

        let removed = config.filters.remove(index);
        info!(url = %removed.url, id = removed.id, "Removed filter");
        Ok(removed)
    }

    /// Enables or disables the filter with `url`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownUrl`] if no filter has that URL.
    pub fn set_filter_enabled(&self, url: &str, enabled: bool) -> Result<(), StoreError> {
        let mut config = self.write_lock();
        let filter = config
            .filters
            .iter_mut()
            .find(|f| f.url == url)
            .ok_or_else(|| StoreError::UnknownUrl(url.to_string()))?;
        filter.enabled = enabled;
        Ok(())
    }

    /// Stores freshly obtained contents for the filter with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownId`] if no filter has that identifier.
    pub fn set_filter_contents(
        &self,
        id: i64,
        contents: Vec<u8>,
        rules_count: u64,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut config = self.write_lock();
        let filter = config
            .filters
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(StoreError::UnknownId(id))?;
        filter.contents = Some(contents);
        filter.rules_count = rules_count;
        filter.last_updated = Some(updated_at);
        Ok(())
    }

    /// Replaces the user rules.
    pub fn set_user_rules(&self, rules: Vec<String>) {
        self.write_lock().user_rules = rules;
    }

    /// Reads cached contents for every enabled filter.
    ///
    /// A filter without a cache file keeps no contents. Returns the number
    /// of filters whose contents were read.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Read`] if a cache file exists but cannot be read.
    pub fn load_filter_contents(&self) -> Result<usize, LoadError> {
        let mut config = self.write_lock();
        let mut loaded = 0;
        for filter in config.filters.iter_mut().filter(|f| f.enabled) {
            let path = filter.path(self.paths.filters_dir());
            match read_optional(&path) {
                Ok(Some(contents)) => {
                    debug!(path = %path.display(), "Read filter contents");
                    filter.contents = Some(contents);
                    loaded += 1;
                }
                Ok(None) => debug!(path = %path.display(), "No cached filter contents"),
                Err(source) => return Err(LoadError::Read { path, source }),
            }
        }
        Ok(loaded)
    }

    /// Writes the contents of every filter that has them.
    ///
    /// Returns the number of files written.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] for the first write that fails.
    pub fn save_filter_contents(&self) -> Result<usize, PersistError> {
        let config = self.write_lock();
        let mut written = 0;
        for filter in &config.filters {
            if let Some(contents) = &filter.contents {
                write_atomic(&filter.path(self.paths.filters_dir()), contents)?;
                written += 1;
            }
        }
        Ok(written)
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, Configuration> {
        self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, Configuration> {
        self.config.write().unwrap_or_else(PoisonError::into_inner)
    }
}
