use chrono::Utc;
use tracing::info;

use crate::config::Config;
use crate::models::ResumeDocument;
use crate::notify::{Toast, ToastLog};
use crate::preview::SurfaceOpener;
use crate::storage::StorageAdapter;

/// The single application state, passed by reference to every editor and binder.
///
/// Owns the in-memory document; every mutation is followed by `persist()`.
pub struct AppState {
    pub config: Config,
    pub document: ResumeDocument,
    pub storage: StorageAdapter,
    pub toasts: ToastLog,
    /// Opens the separate preview surface.
    pub opener: Box<dyn SurfaceOpener>,
    /// Whether the declaration section is on screen. It can be open while the
    /// declaration text is still empty (just added, nothing typed yet).
    pub declaration_open: bool,
    notices: Vec<Toast>,
}

impl AppState {
    /// Builds the state from whatever is persisted, or a fresh document.
    pub fn new(config: Config, storage: StorageAdapter, opener: Box<dyn SurfaceOpener>) -> Self {
        let document = match storage.load() {
            Some(doc) => doc,
            None => {
                info!("Starting with an empty document");
                ResumeDocument::default()
            }
        };
        let declaration_open = !document.declaration.is_empty();
        let toasts = ToastLog::new(config.toast_ttl_ms);

        AppState {
            config,
            document,
            storage,
            toasts,
            opener,
            declaration_open,
            notices: Vec::new(),
        }
    }

    /// Writes the document through to storage. On failure the user gets a warning
    /// and the in-memory document is left untouched.
    pub fn persist(&mut self) -> bool {
        match self.storage.save(&self.document) {
            Ok(()) => {
                self.notify(Toast::saved());
                true
            }
            Err(e) => {
                if let Some(toast) = e.notice() {
                    self.notify(toast);
                }
                false
            }
        }
    }

    /// Resets every field and collection to its default and persists the reset.
    pub fn clear_all(&mut self) {
        self.document = ResumeDocument::default();
        self.declaration_open = false;
        info!("Cleared all form data");
        self.persist();
    }

    pub fn notify(&mut self, toast: Toast) {
        if self.toasts.show(toast.clone(), Utc::now()) {
            self.notices.push(toast);
        }
    }

    /// Notices raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
impl AppState {
    /// State over a fresh in-memory store; the returned store handle sees every write.
    pub fn for_tests() -> (AppState, crate::storage::MemoryStore) {
        let store = crate::storage::MemoryStore::new();
        let state = Self::over_store(store.clone());
        (state, store)
    }

    /// A new session over an existing store, as after a page reload.
    pub fn over_store(store: crate::storage::MemoryStore) -> AppState {
        let config = Config::default();
        let storage = StorageAdapter::new(Box::new(store), config.storage_key.clone());
        AppState::new(
            config,
            storage,
            Box::new(crate::preview::RecordingOpener::default()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ToastLevel;
    use crate::storage::{KeyValueStore, MemoryStore};

    #[test]
    fn test_new_state_loads_persisted_document() {
        let mut store = MemoryStore::new();
        store
            .set(
                "resumeData",
                r#"{"personalInfo":{"fullName":"Asha Rao"},"declaration":"I confirm."}"#,
            )
            .unwrap();
        let state = AppState::over_store(store);
        assert_eq!(state.document.personal_info.full_name, "Asha Rao");
        assert!(state.declaration_open);
    }

    #[test]
    fn test_corrupt_storage_starts_fresh() {
        let mut store = MemoryStore::new();
        store.set("resumeData", "not json").unwrap();
        let state = AppState::over_store(store);
        assert_eq!(state.document, ResumeDocument::default());
        assert!(!state.declaration_open);
    }

    #[test]
    fn test_persist_failure_warns_and_keeps_document() {
        let (mut state, store) = AppState::for_tests();
        state.document.personal_info.full_name = "Asha".to_string();
        store.set_available(false);

        assert!(!state.persist());
        assert_eq!(state.document.personal_info.full_name, "Asha");
        let notices = state.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, ToastLevel::Warning);
        assert!(notices[0].message.contains("Unable to save"));
    }

    #[test]
    fn test_quota_failure_warns() {
        let store = MemoryStore::with_quota(64);
        let mut state = AppState::over_store(store);
        state.document.personal_info.summary = "x".repeat(100);
        assert!(!state.persist());
        assert_eq!(state.take_notices()[0].level, ToastLevel::Warning);
    }

    #[test]
    fn test_clear_all_is_persisted() {
        let (mut state, store) = AppState::for_tests();
        state.document.personal_info.full_name = "Asha".to_string();
        state.document.hobbies.push(Default::default());
        state.document.declaration = "I confirm.".to_string();
        state.declaration_open = true;
        state.persist();

        state.clear_all();
        assert_eq!(state.document, ResumeDocument::default());
        assert!(!state.declaration_open);

        let reloaded = AppState::over_store(store);
        assert_eq!(reloaded.document, ResumeDocument::default());
    }

    #[test]
    fn test_save_notices_coalesce() {
        let (mut state, _store) = AppState::for_tests();
        state.persist();
        state.persist();
        let notices = state.take_notices();
        assert_eq!(notices, vec![Toast::saved()]);
        assert!(state.take_notices().is_empty());
    }
}
