//! Configuration layer for dnsguard.
//!
//! This module provides:
//! - The persisted data model ([`Configuration`], [`ResolverConfig`], [`FilterEntry`])
//! - Default values ([`defaults`])
//! - Load, persist, and render errors ([`LoadError`], [`PersistError`], [`RenderError`])
//! - CLI argument parsing ([`Cli`], [`Command`])
//!
//! # Persisted Layout
//!
//! The YAML document mirrors the declaration order of [`Configuration`]:
//! bind host and port, auth, language, the `coredns` block, the filter list,
//! the optional user rules, and finally `schema_version`.
//!
//! Filter entries persist `enabled`, `url`, `name`, `last_updated` (when
//! known), and `id`. Rule counts and filter contents never reach the
//! document; contents live in `data/filters/<id>.txt`.
//!
//! The profiling, cache, and metrics directives of [`ResolverConfig`] are
//! runtime-only and are spliced verbatim into the rendered Corefile.

mod cli;
pub mod defaults;
mod error;
mod model;

#[cfg(test)]
mod model_tests;

pub use cli::{Cli, Command};
pub use error::{LoadError, PersistError, RenderError};
pub use model::{Configuration, FilterEntry, ResolverConfig};
