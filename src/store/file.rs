//! File primitives with atomic write semantics.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::config::PersistError;

/// Reads a whole file, mapping absence to `None`.
///
/// # Errors
///
/// Returns any I/O error other than `NotFound`.
pub fn read_optional(path: &Path) -> std::io::Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Replaces `path` with `contents`.
///
/// Writes `{path}.tmp`, syncs it, then renames it over `path`, so after a
/// crash the file holds either the old or the new contents in full.
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns [`PersistError::Write`] naming the path that failed.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), PersistError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_error(parent))?;
        }
    }

    // Append .tmp instead of replacing extension (Corefile -> Corefile.tmp)
    let temp_path = temp_path_for(path);

    let mut file = File::create(&temp_path).map_err(write_error(&temp_path))?;
    file.write_all(contents).map_err(write_error(&temp_path))?;
    file.sync_all().map_err(write_error(&temp_path))?;
    drop(file);

    fs::rename(&temp_path, path).map_err(write_error(path))?;
    Ok(())
}

/// Sibling path `{path}.tmp`, built without a lossy string round trip.
pub(super) fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> PersistError {
    let path = path.to_path_buf();
    move |source| PersistError::Write { path, source }
}
