use anyhow::Result;
use evdir_core::{EvdirConfig, Event, EventStore, QueryDefaults};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    // The store rereads its file on every load, so edits to the data file
    // show up on the next request without a restart.
    store: EventStore,
    defaults: QueryDefaults,
}

impl AppState {
    pub fn new(store: EventStore, defaults: QueryDefaults) -> Self {
        AppState { store, defaults }
    }

    pub fn from_config(config: &EvdirConfig) -> Self {
        Self::new(
            EventStore::new(config.data_file_path()),
            config.query_defaults(),
        )
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn query_defaults(&self) -> &QueryDefaults {
        &self.defaults
    }

    /// Load a fresh snapshot of the events file off the async runtime.
    pub async fn events(&self) -> Result<Vec<Event>> {
        let store = self.store.clone();
        let events = tokio::task::spawn_blocking(move || store.load()).await??;
        Ok(events)
    }
}
