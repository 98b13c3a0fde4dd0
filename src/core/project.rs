//! Project root discovery.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{Result, WorkflowError};

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = ".aisdlc";

/// Name of the lock file recording the active workstream.
pub const LOCK_FILE: &str = ".aisdlc.lock";

/// Find the project root by searching `start` and its ancestors for the
/// config file.
///
/// Falls back to `start` itself when no ancestor holds one, which is where
/// `init` bootstraps a new project.
pub fn find_project_root(start: &Path) -> PathBuf {
    for dir in start.ancestors() {
        if dir.join(CONFIG_FILE).is_file() {
            debug!("Found project root at {}", dir.display());
            return dir.to_path_buf();
        }
    }
    start.to_path_buf()
}

/// Write a file atomically (write to temp, then rename).
pub fn write_file_atomic(path: &Path, content: &str) -> Result<()> {
    let temp_path = temp_path_for(path);

    fs::write(&temp_path, content).map_err(|e| WorkflowError::io(&temp_path, e))?;

    // Rename to final location (atomic on most systems)
    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        WorkflowError::io(path, e)
    })?;

    Ok(())
}

/// Staging path for an atomic write: the full file name plus `.tmp`.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
