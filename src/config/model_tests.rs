//! Tests for the configuration data model and its YAML layout.

use chrono::{TimeZone, Utc};

use super::defaults;
use super::model::{Configuration, FilterEntry, ResolverConfig};

fn position(yaml: &str, key: &str) -> usize {
    yaml.find(key)
        .unwrap_or_else(|| panic!("key {key} missing from:\n{yaml}"))
}

mod defaults_shape {
    use super::*;

    #[test]
    fn fresh_configuration_is_current_schema() {
        let config = Configuration::default();

        assert_eq!(config.schema_version, defaults::CURRENT_SCHEMA_VERSION);
        assert_eq!(config.bind_host, "127.0.0.1");
        assert_eq!(config.bind_port, 3000);
        assert!(config.user_rules.is_empty());
    }

    #[test]
    fn builtin_filters_have_distinct_nonzero_ids() {
        let config = Configuration::default();
        let mut ids: Vec<i64> = config.filters.iter().map(|f| f.id).collect();
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), config.filters.len());
        assert!(ids.iter().all(|&id| id > 0));
    }

    #[test]
    fn resolver_defaults_are_functional() {
        let resolver = ResolverConfig::default();

        assert_eq!(resolver.port, 53);
        assert!(resolver.protection_enabled);
        assert!(resolver.filtering_enabled);
        assert_eq!(resolver.upstream_dns, vec!["tls://1.1.1.1", "tls://1.0.0.1"]);
        assert_eq!(resolver.bootstrap_dns, "8.8.8.8:53");
        assert_eq!(resolver.cache, "cache");
        assert_eq!(resolver.prometheus, "prometheus :9153");
        assert!(resolver.pprof.is_empty());
    }
}

mod serialization {
    use super::*;

    #[test]
    fn top_level_keys_follow_declaration_order() {
        let mut config = Configuration::default();
        config.user_rules = vec!["||example.org^".to_string()];
        let yaml = serde_yaml::to_string(&config).unwrap();

        let keys = [
            "bind_host:",
            "bind_port:",
            "auth_name:",
            "auth_pass:",
            "language:",
            "coredns:",
            "filters:",
            "user_rules:",
            "schema_version:",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| position(&yaml, k)).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{yaml}");
    }

    #[test]
    fn empty_user_rules_are_omitted() {
        let yaml = serde_yaml::to_string(&Configuration::default()).unwrap();
        assert!(!yaml.contains("user_rules"));
    }

    #[test]
    fn runtime_only_fields_are_not_written() {
        let mut config = Configuration::default();
        config.resolver.pprof = "pprof :6060".to_string();
        config.filters[0].contents = Some(b"||ads.example^\n".to_vec());
        config.filters[0].rules_count = 1;
        let yaml = serde_yaml::to_string(&config).unwrap();

        assert!(!yaml.contains("pprof"));
        assert!(!yaml.contains("prometheus"));
        assert!(!yaml.contains("cache"));
        assert!(!yaml.contains("contents"));
        assert!(!yaml.contains("rules_count"));
    }

    #[test]
    fn filter_entry_keys_follow_declaration_order() {
        let mut entry = FilterEntry::new(7, "https://a.example/list.txt", "A", true);
        entry.last_updated = Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        let yaml = serde_yaml::to_string(&entry).unwrap();

        let keys = ["enabled:", "url:", "name:", "last_updated:", "id:"];
        let positions: Vec<usize> = keys.iter().map(|k| position(&yaml, k)).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{yaml}");
    }

    #[test]
    fn missing_timestamp_is_omitted() {
        let entry = FilterEntry::new(7, "https://a.example/list.txt", "A", true);
        let yaml = serde_yaml::to_string(&entry).unwrap();
        assert!(!yaml.contains("last_updated"));
    }
}

mod deserialization {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: Configuration = serde_yaml::from_str("bind_port: 8080\n").unwrap();

        assert_eq!(config.bind_port, 8080);
        assert_eq!(config.bind_host, defaults::BIND_HOST);
        assert_eq!(config.filters, Configuration::default().filters);
        assert_eq!(config.resolver.cache, defaults::CACHE_DIRECTIVE);
        assert_eq!(config.resolver.prometheus, defaults::METRICS_DIRECTIVE);
    }

    #[test]
    fn missing_schema_version_reads_as_legacy() {
        let config: Configuration = serde_yaml::from_str("language: de\n").unwrap();
        assert_eq!(config.schema_version, 0);
    }

    #[test]
    fn filter_without_id_reads_as_zero() {
        let yaml = r"
filters:
- enabled: true
  url: https://a.example/list.txt
  name: A
schema_version: 1
";
        let config: Configuration = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.filters.len(), 1);
        assert_eq!(config.filters[0].id, 0);
        assert!(config.filters[0].contents.is_none());
    }

    #[test]
    fn keep_fragments_restores_runtime_directives() {
        let mut current = ResolverConfig::default();
        current.pprof = "pprof :6060".to_string();
        current.cache = "cache 30".to_string();

        let mut parsed: ResolverConfig = serde_yaml::from_str("port: 5353\n").unwrap();
        parsed.keep_fragments_from(&current);

        assert_eq!(parsed.port, 5353);
        assert_eq!(parsed.pprof, "pprof :6060");
        assert_eq!(parsed.cache, "cache 30");
        assert_eq!(parsed.prometheus, defaults::METRICS_DIRECTIVE);
    }
}

mod filter_entry {
    use super::*;
    use std::path::Path;

    #[test]
    fn path_uses_id_file_name() {
        let entry = FilterEntry::new(42, "https://a/", "A", true);
        assert_eq!(
            entry.path(Path::new("/data/filters")),
            Path::new("/data/filters/42.txt")
        );
    }

    #[test]
    fn active_requires_enabled_and_nonempty_contents() {
        let mut entry = FilterEntry::new(1, "https://a/", "A", true);
        assert!(!entry.is_active());

        entry.contents = Some(Vec::new());
        assert!(!entry.is_active());

        entry.contents = Some(b"rule\n".to_vec());
        assert!(entry.is_active());

        entry.enabled = false;
        assert!(!entry.is_active());
    }
}
