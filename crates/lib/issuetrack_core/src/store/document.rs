//! Whole-collection JSON document on disk.
//!
//! The file is always rewritten in full: the new contents go to a temporary
//! file in the same directory, are synced, then renamed over the target.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::StoreError;
use crate::models::issue::Issue;

/// Read the collection. A missing or blank file is an empty collection.
pub(crate) async fn load(path: &Path) -> Result<Vec<Issue>, StoreError> {
    let raw = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "issues file absent, treating as empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(StoreError::Io(e)),
    };

    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    serde_json::from_slice(&raw).map_err(|e| StoreError::Corrupt {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Replace the collection on disk. Blocking; run it off the async workers.
pub(crate) fn save(path: &Path, issues: &[Issue]) -> Result<(), StoreError> {
    let mut payload =
        serde_json::to_vec_pretty(issues).map_err(|e| StoreError::Io(std::io::Error::other(e)))?;
    payload.push(b'\n');
    write_atomic(path, &payload)?;

    debug!(path = %path.display(), count = issues.len(), "issues file written");
    Ok(())
}

fn write_atomic(target: &Path, payload: &[u8]) -> Result<(), StoreError> {
    let dir = parent_dir(target);
    std::fs::create_dir_all(&dir)?;

    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(payload)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
