//! Default values for configuration options.
//!
//! Centralized constants so a fresh install produces a working configuration
//! without any external input.

/// File name of the main configuration document.
pub const CONFIG_FILE_NAME: &str = "dnsguard.yaml";

/// File name of the rendered resolver configuration.
pub const RESOLVER_CONFIG_FILE_NAME: &str = "Corefile";

/// Data storage directory, relative to the working directory.
pub const DATA_DIR: &str = "data";

/// Filter contents cache, relative to [`DATA_DIR`].
pub const FILTER_DIR: &str = "filters";

/// Schema version written by this build.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Management interface bind address.
pub const BIND_HOST: &str = "127.0.0.1";

/// Management interface port.
pub const BIND_PORT: u16 = 3000;

/// Interface language (two-letter ISO 639-1 code).
pub const LANGUAGE: &str = "en";

/// Port the resolver listens on.
pub const RESOLVER_PORT: u16 = 53;

/// TTL in seconds for blocked responses.
pub const BLOCKED_RESPONSE_TTL: u32 = 10;

/// Queries per second per client; 0 disables rate limiting.
pub const RATELIMIT: u32 = 20;

/// Plain DNS server used to resolve upstream host names.
pub const BOOTSTRAP_DNS: &str = "8.8.8.8:53";

/// Upstream resolvers.
pub const UPSTREAM_DNS: &[&str] = &["tls://1.1.1.1", "tls://1.0.0.1"];

/// Cache directive spliced into the resolver config.
pub const CACHE_DIRECTIVE: &str = "cache";

/// Metrics endpoint directive spliced into the resolver config.
pub const METRICS_DIRECTIVE: &str = "prometheus :9153";

/// Built-in filter list: `(id, enabled, url, name)`.
pub const FILTERS: &[(i64, bool, &str, &str)] = &[
    (
        1,
        true,
        "https://adguardteam.github.io/AdGuardSDNSFilter/Filters/filter.txt",
        "AdGuard Simplified Domain Names filter",
    ),
    (2, false, "https://adaway.org/hosts.txt", "AdAway"),
    (
        3,
        false,
        "https://hosts-file.net/ad_servers.txt",
        "hpHosts - Ad and Tracking servers only",
    ),
    (
        4,
        false,
        "http://www.malwaredomainlist.com/hostslist/hosts.txt",
        "MalwareDomainList.com Hosts List",
    ),
];

/// Default upstream resolvers as owned strings.
#[must_use]
pub fn upstream_dns() -> Vec<String> {
    UPSTREAM_DNS.iter().map(ToString::to_string).collect()
}

/// Default cache directive as an owned string.
#[must_use]
pub fn cache_directive() -> String {
    CACHE_DIRECTIVE.to_string()
}

/// Default metrics directive as an owned string.
#[must_use]
pub fn metrics_directive() -> String {
    METRICS_DIRECTIVE.to_string()
}
