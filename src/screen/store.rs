use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::error::ExplorerError;
use crate::screen::screen_model::PageSnapshot;

/// Append-only JSON array of captured snapshots.
///
/// An entry is dropped as a duplicate only when both `url` and `capturedAt`
/// match an existing entry.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncate the store to an empty array.
    pub fn reset(&self) -> Result<(), ExplorerError> {
        std::fs::write(&self.path, "[]").map_err(|e| ExplorerError::Io {
            context: format!("resetting {}", self.path.display()),
            source: e,
        })?;
        info!(path = %self.path.display(), "cleared snapshot store");
        Ok(())
    }

    /// Existing entries; a missing, unreadable or non-array file reads as empty.
    pub fn load(&self) -> Vec<Value> {
        let Ok(content) = std::fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(entries)) => entries,
            _ => Vec::new(),
        }
    }

    /// Append a snapshot. Returns `false` if it was a duplicate.
    pub fn append(&self, snapshot: &PageSnapshot) -> Result<bool, ExplorerError> {
        let mut entries = self.load();

        let duplicate = entries.iter().any(|entry| {
            entry["url"].as_str() == Some(snapshot.url.as_str())
                && entry["capturedAt"].as_u64() == Some(snapshot.captured_at)
        });

        if duplicate {
            debug!(url = %snapshot.url, "duplicate snapshot, skipping append");
            return Ok(false);
        }

        let value = serde_json::to_value(snapshot).map_err(|e| ExplorerError::JsonSerialize {
            context: "PageSnapshot".into(),
            source: e,
        })?;
        entries.push(value);

        let json =
            serde_json::to_string_pretty(&entries).map_err(|e| ExplorerError::JsonSerialize {
                context: "snapshot store".into(),
                source: e,
            })?;

        std::fs::write(&self.path, json).map_err(|e| ExplorerError::Io {
            context: format!("writing {}", self.path.display()),
            source: e,
        })?;

        Ok(true)
    }
}
