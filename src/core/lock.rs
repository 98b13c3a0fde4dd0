//! Persistence of the active workstream record.
//!
//! The lock file holds at most one record. An empty JSON object means no
//! workstream is active; so does a missing or unreadable file.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use super::error::Result;
use super::project::{write_file_atomic, LOCK_FILE};

/// The active workstream and the step it is at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lock {
    /// Workstream identifier (directory name)
    pub slug: String,
    /// Step the workstream has reached
    pub current: String,
    /// When the workstream was started
    #[serde(deserialize_with = "deserialize_created")]
    pub created: DateTime<Utc>,
}

/// Accept RFC 3339 timestamps, and offset-less ones as UTC.
fn deserialize_created<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(created) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(created.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(serde::de::Error::custom)
}

impl Lock {
    /// Start a lock at the given step, stamped with the current time.
    pub fn new(slug: impl Into<String>, current: impl Into<String>) -> Self {
        Self { slug: slug.into(), current: current.into(), created: Utc::now() }
    }
}

/// Reads and writes the lock file under a project root.
#[derive(Debug, Clone)]
pub struct LockStore {
    path: PathBuf,
}

impl LockStore {
    /// Create a store for the lock file in `root`.
    pub fn new(root: &Path) -> Self {
        Self { path: root.join(LOCK_FILE) }
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the active lock.
    ///
    /// Never fails: a corrupt or unreadable file is logged and treated as
    /// "no active workstream".
    pub fn read(&self) -> Option<Lock> {
        if !self.path.exists() {
            return None;
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Could not read '{}' file: {}. Treating as empty.", LOCK_FILE, e);
                return None;
            }
        };

        let value: serde_json::Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(_) => {
                warn!("'{}' file is corrupted or not valid JSON. Treating as empty.", LOCK_FILE);
                return None;
            }
        };

        if value.as_object().is_some_and(|map| map.is_empty()) {
            return None;
        }

        match serde_json::from_value(value) {
            Ok(lock) => Some(lock),
            Err(e) => {
                warn!("'{}' file is incomplete ({}). Treating as empty.", LOCK_FILE, e);
                None
            }
        }
    }

    /// Persist a lock, replacing any existing one.
    pub fn write(&self, lock: &Lock) -> Result<()> {
        let content = serde_json::to_string_pretty(lock)?;
        write_file_atomic(&self.path, &content)?;
        debug!("Wrote lock {} @ {}", lock.slug, lock.current);
        Ok(())
    }

    /// Record that no workstream is active.
    pub fn clear(&self) -> Result<()> {
        write_file_atomic(&self.path, "{}")?;
        debug!("Cleared lock");
        Ok(())
    }
}
