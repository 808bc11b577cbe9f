//! Local persistence for the document: one key in a key-value store holding
//! the serialized `ResumeDocument`.

pub mod file;
#[cfg(test)]
pub mod memory;

pub use file::FileStore;
#[cfg(test)]
pub use memory::MemoryStore;

use tracing::{debug, info, warn};

use crate::errors::FormError;
use crate::models::ResumeDocument;

/// A synchronous string key-value store, the shape of a browser's local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, FormError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), FormError>;
}

/// Reads and writes the document under a single key.
pub struct StorageAdapter {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl StorageAdapter {
    pub fn new(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        StorageAdapter {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loads and backfills the persisted document.
    /// Returns `None` when nothing is stored or the record cannot be read; never errors.
    pub fn load(&self) -> Option<ResumeDocument> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No persisted document under '{}'", self.key);
                return None;
            }
            Err(e) => {
                warn!("Could not read persisted document: {e}");
                return None;
            }
        };

        match ResumeDocument::from_persisted(&raw) {
            Ok(doc) => {
                info!("Loaded persisted document ({} bytes)", raw.len());
                Some(doc)
            }
            Err(e) => {
                warn!("Discarding unreadable persisted document: {e}");
                None
            }
        }
    }

    /// Serializes and writes the document. The caller keeps its in-memory copy either way.
    pub fn save(&mut self, doc: &ResumeDocument) -> Result<(), FormError> {
        let raw = serde_json::to_string(doc)?;
        self.store.set(&self.key, &raw)?;
        debug!("Persisted document ({} bytes)", raw.len());
        Ok(())
    }
}
