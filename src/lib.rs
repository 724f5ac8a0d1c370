//! dnsguard: DNS filtering configuration store
//!
//! A library holding the settings of a DNS filtering service, persisting
//! them as YAML, and rendering the downstream resolver's Corefile.

pub mod config;
pub mod filter;
pub mod render;
pub mod store;
