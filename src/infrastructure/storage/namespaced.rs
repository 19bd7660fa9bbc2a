//! Prefix-scoped view over a key-value store.

use std::sync::Arc;

use crate::domain::{KeyValueStore, StorageOp};
use crate::shared::error::StorageError;

/// Scopes every key under a fixed prefix.
///
/// Keys outside the prefix are invisible to `purge`, so several applications
/// can share one underlying store.
#[derive(Clone)]
pub struct NamespacedStore {
    prefix: String,
    inner: Arc<dyn KeyValueStore>,
}

impl NamespacedStore {
    pub fn new(prefix: impl Into<String>, inner: Arc<dyn KeyValueStore>) -> Self {
        Self {
            prefix: prefix.into(),
            inner,
        }
    }

    /// Full key for `name`.
    pub fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    pub fn get(&self, name: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(&self.key(name))
    }

    pub fn set(&self, name: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(&self.key(name), value)
    }

    /// Apply a batch of writes whose keys are names within the namespace.
    pub fn apply(&self, ops: Vec<StorageOp>) -> Result<(), StorageError> {
        let scoped = ops
            .into_iter()
            .map(|op| match op {
                StorageOp::Set(name, value) => StorageOp::Set(self.key(&name), value),
                StorageOp::Remove(name) => StorageOp::Remove(self.key(&name)),
            })
            .collect();
        self.inner.apply(scoped)
    }

    /// Remove every key under the prefix, and nothing else.
    ///
    /// Returns the number of keys removed.
    pub fn purge(&self) -> Result<usize, StorageError> {
        let ops: Vec<StorageOp> = self
            .inner
            .keys()?
            .into_iter()
            .filter(|k| k.starts_with(&self.prefix))
            .map(StorageOp::Remove)
            .collect();

        let removed = ops.len();
        if removed > 0 {
            self.inner.apply(ops)?;
        }
        Ok(removed)
    }

    /// Remove every key in the underlying store, prefixed or not.
    pub fn clear_all(&self) -> Result<(), StorageError> {
        self.inner.clear()
    }
}

impl std::fmt::Debug for NamespacedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespacedStore")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}
