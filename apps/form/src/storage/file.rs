use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::FormError;
use crate::storage::KeyValueStore;

/// Disk-backed store: each key is a `<key>.json` file under one directory.
///
/// Writes are plain synchronous overwrites; a crash mid-write can truncate the record,
/// which `StorageAdapter::load` then treats as absent.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    quota: usize,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>, quota: usize) -> Self {
        FileStore {
            dir: dir.into(),
            quota,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_stem: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file_stem}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, FormError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FormError::Storage(format!("{}: {e}", path.display()))),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), FormError> {
        if value.len() > self.quota {
            return Err(FormError::QuotaExceeded {
                needed: value.len(),
                quota: self.quota,
            });
        }
        fs::create_dir_all(&self.dir)
            .map_err(|e| FormError::Storage(format!("{}: {e}", self.dir.display())))?;

        let path = self.path_for(key);
        fs::write(&path, value)
            .map_err(|e| FormError::Storage(format!("{}: {e}", path.display())))?;
        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path().join("nested"), 1024);
        assert_eq!(store.get("resumeData").unwrap(), None);
        store.set("resumeData", "{\"a\":1}").unwrap();
        assert_eq!(store.get("resumeData").unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(tmp.path().join("nested/resumeData.json").exists());
    }

    #[test]
    fn test_quota_is_enforced_before_writing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path(), 3);
        let err = store.set("resumeData", "toolong").unwrap_err();
        assert!(matches!(err, FormError::QuotaExceeded { .. }));
        assert_eq!(store.get("resumeData").unwrap(), None);
    }

    #[test]
    fn test_key_cannot_escape_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path(), 1024);
        assert_eq!(
            store.path_for("../etc/passwd"),
            tmp.path().join("___etc_passwd.json")
        );
    }
}
