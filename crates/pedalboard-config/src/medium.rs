//! Persistence media for the preset store.
//!
//! A [`KeyValueStore`] holds string values under `(namespace, key)` pairs.
//! [`MemoryStore`] keeps them in a map; [`FileStore`] writes one file per key
//! under `<root>/<namespace>/<key>.json`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Namespaced string storage.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` if absent.
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, namespace: &str, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a value. Returns whether it existed.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<bool, StoreError>;
}

/// In-memory medium. Contents vanish with the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<(String, String), String>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .entries
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }

    fn set(&mut self, namespace: &str, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .insert((namespace.to_string(), key.to_string()), value.to_string());
        Ok(())
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<bool, StoreError> {
        Ok(self
            .entries
            .remove(&(namespace.to_string(), key.to_string()))
            .is_some())
    }
}

/// Directory-backed medium.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

fn check_segment(segment: &str) -> Result<(), StoreError> {
    let bad = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\', '\0']);
    if bad {
        return Err(StoreError::InvalidKey(segment.to_string()));
    }
    Ok(())
}

impl FileStore {
    /// Medium rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `(namespace, key)`.
    pub fn path_for(&self, namespace: &str, key: &str) -> Result<PathBuf, StoreError> {
        check_segment(namespace)?;
        check_segment(key)?;
        Ok(self.root.join(namespace).join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(namespace, key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::storage(path, e)),
        }
    }

    fn set(&mut self, namespace: &str, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(namespace, key)?;
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::storage(parent, e))?;
        }
        // Readers never observe a partially written file.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|e| StoreError::storage(&tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| StoreError::storage(&path, e))?;
        tracing::debug!(path = %path.display(), bytes = value.len(), "store written");
        Ok(())
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<bool, StoreError> {
        let path = self.path_for(namespace, key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::storage(path, e)),
        }
    }
}
