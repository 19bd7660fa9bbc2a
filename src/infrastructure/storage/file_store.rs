//! JSON-file key-value store.
//!
//! The long-lived namespace: survives process restarts the way browser local
//! storage survives a page reload. Every batch rewrites the whole file through
//! a temporary sibling and a rename, so a crash never leaves a half-written
//! store behind.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::debug;

use crate::domain::{KeyValueStore, StorageOp};
use crate::shared::error::StorageError;

/// File-backed store with an in-memory copy of its contents.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), keys = entries.len(), "Opened file store");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn apply(&self, ops: Vec<StorageOp>) -> Result<(), StorageError> {
        let mut entries = self.entries.write();
        let mut next = entries.clone();
        for op in ops {
            match op {
                StorageOp::Set(key, value) => {
                    next.insert(key, value);
                }
                StorageOp::Remove(key) => {
                    next.remove(&key);
                }
            }
        }

        // Memory only changes once the file write succeeded.
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.read().keys().cloned().collect())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut entries = self.entries.write();
        let empty = BTreeMap::new();
        self.persist(&empty)?;
        *entries = empty;
        Ok(())
    }
}
