use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::errors::FormError;
use crate::storage::KeyValueStore;

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, String>,
    quota: Option<usize>,
    unavailable: bool,
}

/// In-process store. Clones share the same entries, so a clone can stand in for
/// "the same browser profile" after a reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().quota = Some(quota);
        store
    }

    /// Simulates a store that refuses access (private mode, disabled storage).
    pub fn set_available(&self, available: bool) {
        self.inner.borrow_mut().unavailable = !available;
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, FormError> {
        let inner = self.inner.borrow();
        if inner.unavailable {
            return Err(FormError::Storage("memory store disabled".to_string()));
        }
        Ok(inner.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), FormError> {
        let mut inner = self.inner.borrow_mut();
        if inner.unavailable {
            return Err(FormError::Storage("memory store disabled".to_string()));
        }
        if let Some(quota) = inner.quota {
            if value.len() > quota {
                return Err(FormError::QuotaExceeded {
                    needed: value.len(),
                    quota,
                });
            }
        }
        inner.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_rejects_large_values() {
        let mut store = MemoryStore::with_quota(4);
        store.set("k", "1234").unwrap();
        let err = store.set("k", "12345").unwrap_err();
        assert!(matches!(err, FormError::QuotaExceeded { needed: 5, quota: 4 }));
        assert_eq!(store.raw("k").as_deref(), Some("1234"));
    }

    #[test]
    fn test_clones_share_entries() {
        let mut a = MemoryStore::new();
        let b = a.clone();
        a.set("k", "v").unwrap();
        assert_eq!(b.get("k").unwrap().as_deref(), Some("v"));
    }
}
