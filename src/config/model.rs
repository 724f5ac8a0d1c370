//! In-memory configuration data model.
//!
//! Plain data only. Synchronization lives in [`crate::store::ConfigStore`],
//! so these types serialize without special-casing a lock field.
//!
//! Field order matters: the YAML document mirrors declaration order, and
//! users are expected to edit that file by hand.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::defaults;

/// Root of the persisted settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Management interface bind address.
    pub bind_host: String,

    /// Management interface port.
    pub bind_port: u16,

    /// Basic-auth user name; empty disables authentication.
    pub auth_name: String,

    /// Basic-auth password.
    pub auth_pass: String,

    /// Two-letter ISO 639-1 language code.
    pub language: String,

    /// Settings for the downstream resolver.
    #[serde(rename = "coredns")]
    pub resolver: ResolverConfig,

    /// Filter sources in rendering order.
    pub filters: Vec<FilterEntry>,

    /// Rules typed in by the user, one per entry.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub user_rules: Vec<String>,

    /// Kept last so users are less tempted to edit it.
    ///
    /// A document without this key is a legacy (version 0) document.
    #[serde(default)]
    pub schema_version: u32,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            bind_host: defaults::BIND_HOST.to_string(),
            bind_port: defaults::BIND_PORT,
            auth_name: String::new(),
            auth_pass: String::new(),
            language: defaults::LANGUAGE.to_string(),
            resolver: ResolverConfig::default(),
            filters: defaults::FILTERS
                .iter()
                .map(|&(id, enabled, url, name)| FilterEntry::new(id, url, name, enabled))
                .collect(),
            user_rules: Vec::new(),
            schema_version: defaults::CURRENT_SCHEMA_VERSION,
        }
    }
}

/// Settings rendered into the resolver's config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub port: u16,
    pub protection_enabled: bool,
    pub filtering_enabled: bool,
    pub safebrowsing_enabled: bool,
    pub safesearch_enabled: bool,
    pub parental_enabled: bool,
    pub parental_sensitivity: u32,
    pub blocked_response_ttl: u32,
    pub querylog_enabled: bool,
    /// Queries per second; 0 disables the directive.
    pub ratelimit: u32,
    pub refuse_any: bool,

    /// Profiling endpoint directive, spliced verbatim.
    #[serde(skip)]
    pub pprof: String,

    /// Cache directive, spliced verbatim.
    #[serde(skip, default = "defaults::cache_directive")]
    pub cache: String,

    /// Metrics endpoint directive, spliced verbatim.
    #[serde(skip, default = "defaults::metrics_directive")]
    pub prometheus: String,

    pub bootstrap_dns: String,
    pub upstream_dns: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            port: defaults::RESOLVER_PORT,
            protection_enabled: true,
            filtering_enabled: true,
            safebrowsing_enabled: false,
            safesearch_enabled: false,
            parental_enabled: false,
            parental_sensitivity: 0,
            blocked_response_ttl: defaults::BLOCKED_RESPONSE_TTL,
            querylog_enabled: true,
            ratelimit: defaults::RATELIMIT,
            refuse_any: true,
            pprof: String::new(),
            cache: defaults::cache_directive(),
            prometheus: defaults::metrics_directive(),
            bootstrap_dns: defaults::BOOTSTRAP_DNS.to_string(),
            upstream_dns: defaults::upstream_dns(),
        }
    }
}

impl ResolverConfig {
    /// Copies the directives that never reach the YAML document.
    ///
    /// A freshly parsed document only carries their defaults, so the
    /// values already in memory are kept instead.
    pub fn keep_fragments_from(&mut self, current: &Self) {
        self.pprof.clone_from(&current.pprof);
        self.cache.clone_from(&current.cache);
        self.prometheus.clone_from(&current.prometheus);
    }
}

/// One filter source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterEntry {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub name: String,

    /// Rule count from the last fetch; not persisted.
    #[serde(skip)]
    pub rules_count: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,

    /// Unique per process; 0 is reserved for the user rules filter.
    #[serde(default)]
    pub id: i64,

    /// Raw filter body; absent until fetched or read from the cache.
    #[serde(skip)]
    pub contents: Option<Vec<u8>>,
}

impl FilterEntry {
    /// Creates an entry without contents.
    #[must_use]
    pub fn new(id: i64, url: impl Into<String>, name: impl Into<String>, enabled: bool) -> Self {
        Self {
            enabled,
            url: url.into(),
            name: name.into(),
            rules_count: 0,
            last_updated: None,
            id,
            contents: None,
        }
    }

    /// Location of this filter's cached contents.
    #[must_use]
    pub fn path(&self, filters_dir: &Path) -> PathBuf {
        filters_dir.join(format!("{}.txt", self.id))
    }

    /// Returns `true` if the contents are present and non-empty.
    #[must_use]
    pub fn has_contents(&self) -> bool {
        self.contents.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Returns `true` if the resolver may reference this filter.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled && self.has_contents()
    }
}
