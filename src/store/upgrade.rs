//! Schema migration for loaded configuration documents.

use crate::config::defaults::CURRENT_SCHEMA_VERSION;
use crate::config::{Configuration, LoadError};
use crate::filter::{FilterIdAllocator, IdsExhausted};

/// Rejects documents written by a newer build.
pub(super) fn check_supported(version: u32) -> Result<(), LoadError> {
    if version > CURRENT_SCHEMA_VERSION {
        return Err(LoadError::UnsupportedSchema {
            found: version,
            supported: CURRENT_SCHEMA_VERSION,
        });
    }
    Ok(())
}

/// Brings `config` to the current schema version.
///
/// `ids` must already be seeded from `config.filters`. Returns the version
/// the document had when an upgrade took place.
pub(super) fn upgrade(
    config: &mut Configuration,
    ids: &FilterIdAllocator,
) -> Result<Option<u32>, IdsExhausted> {
    let from = config.schema_version;
    if from >= CURRENT_SCHEMA_VERSION {
        return Ok(None);
    }

    if config.schema_version == 0 {
        upgrade_v0_to_v1(config, ids)?;
    }

    tracing::warn!(
        from,
        to = config.schema_version,
        "Upgraded configuration schema"
    );
    Ok(Some(from))
}

/// Version 0 documents carried no filter identifiers.
fn upgrade_v0_to_v1(
    config: &mut Configuration,
    ids: &FilterIdAllocator,
) -> Result<(), IdsExhausted> {
    let assigned = ids.reassign_conflicts(&mut config.filters)?;
    tracing::debug!(assigned, "Assigned identifiers to legacy filters");
    config.schema_version = 1;
    Ok(())
}
