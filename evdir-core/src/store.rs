//! Event store: the flat JSON file backing the directory.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{EvdirError, EvdirResult};
use crate::event::Event;

/// Read-only handle on the events file. Nothing is cached: every `load`
/// reads the file again, so edits show up on the next request.
#[derive(Debug, Clone)]
pub struct EventStore {
    path: PathBuf,
}

impl EventStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        EventStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every valid record from the file.
    ///
    /// A missing file, or one that isn't a JSON array, is `StoreUnavailable`.
    /// Individual records that don't validate are skipped with a warning.
    pub fn load(&self) -> EvdirResult<Vec<Event>> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| EvdirError::store(&self.path, e))?;

        let records: Vec<Value> =
            serde_json::from_str(&raw).map_err(|e| EvdirError::store(&self.path, e))?;

        let mut events = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<Event>(record) {
                Ok(event) => events.push(event),
                Err(e) => tracing::warn!(
                    index,
                    error = %e,
                    path = %self.path.display(),
                    "Skipping invalid event record"
                ),
            }
        }

        tracing::debug!(count = events.len(), path = %self.path.display(), "Loaded events");
        Ok(events)
    }
}
