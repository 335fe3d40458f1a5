//! Preset store bound to a persistence medium.
//!
//! [`PresetLibrary`] owns the in-memory [`PresetStore`] and writes it back to
//! its [`KeyValueStore`] as a single JSON document on [`PresetLibrary::flush`].
//! [`PresetLibrary::update`] mutates and flushes as one step, so the store
//! and the medium never disagree after it returns.

use std::path::PathBuf;

use crate::error::StoreError;
use crate::factory_presets;
use crate::medium::{FileStore, KeyValueStore, MemoryStore};
use crate::settings::StorageSettings;
use crate::store::PresetStore;

/// Key the whole store is persisted under.
pub const STORE_KEY: &str = "presets";

/// A preset store and the medium it persists to.
pub struct PresetLibrary {
    store: PresetStore,
    medium: Box<dyn KeyValueStore>,
    namespace: String,
}

impl std::fmt::Debug for PresetLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresetLibrary")
            .field("namespace", &self.namespace)
            .field("banks", &self.store.bank_names())
            .finish_non_exhaustive()
    }
}

impl PresetLibrary {
    /// Load the store persisted under `namespace`, or start empty.
    pub fn open(
        medium: Box<dyn KeyValueStore>,
        namespace: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let namespace = namespace.into();
        let store = match medium.get(&namespace, STORE_KEY)? {
            Some(json) => PresetStore::from_json(&json)?,
            None => PresetStore::new(),
        };
        tracing::debug!(
            namespace = %namespace,
            banks = store.bank_names().len(),
            "preset library opened"
        );
        Ok(Self {
            store,
            medium,
            namespace,
        })
    }

    /// Like [`open`](Self::open), seeding factory presets into an empty store.
    pub fn open_seeded(
        medium: Box<dyn KeyValueStore>,
        namespace: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let mut library = Self::open(medium, namespace)?;
        if library.store.is_empty() {
            let added = factory_presets::seed(&mut library.store);
            tracing::info!(added, "seeded factory presets");
            library.flush()?;
        }
        Ok(library)
    }

    /// Unseeded library backed by memory.
    pub fn in_memory() -> Self {
        Self {
            store: PresetStore::new(),
            medium: Box::new(MemoryStore::new()),
            namespace: crate::settings::DEFAULT_NAMESPACE.to_string(),
        }
    }

    /// File-backed library described by `settings`.
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, StoreError> {
        let dir: PathBuf = settings.resolved_dir();
        let medium = Box::new(FileStore::new(dir));
        if settings.seed_factory_presets {
            Self::open_seeded(medium, settings.namespace.trim())
        } else {
            Self::open(medium, settings.namespace.trim())
        }
    }

    /// The store.
    pub fn store(&self) -> &PresetStore {
        &self.store
    }

    /// Mutable store. Changes are persisted on the next [`flush`](Self::flush).
    pub fn store_mut(&mut self) -> &mut PresetStore {
        &mut self.store
    }

    /// Namespace in the medium.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Write the store to the medium.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        let json = self.store.to_json()?;
        self.medium.set(&self.namespace, STORE_KEY, &json)
    }

    /// Apply `mutate` to the store and flush.
    ///
    /// If `mutate` rejects the change or the medium fails to persist it, the
    /// store is restored to its previous contents and the error returned.
    pub fn update<T>(
        &mut self,
        mutate: impl FnOnce(&mut PresetStore) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let previous = self.store.clone();
        let result = mutate(&mut self.store).and_then(|out| self.flush().map(|()| out));
        if let Err(e) = &result {
            tracing::warn!(namespace = %self.namespace, error = %e, "store change rolled back");
            self.store = previous;
        }
        result
    }

    /// Discard in-memory changes and reload from the medium.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.store = match self.medium.get(&self.namespace, STORE_KEY)? {
            Some(json) => PresetStore::from_json(&json)?,
            None => PresetStore::new(),
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedalboard_core::ChainSnapshot;

    #[test]
    fn flush_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut library = PresetLibrary::open(Box::new(FileStore::new(dir.path())), "ns").unwrap();
        library
            .store_mut()
            .put("lead", "solo", ChainSnapshot::new(0.7))
            .unwrap();
        library.flush().unwrap();

        let reopened = PresetLibrary::open(Box::new(FileStore::new(dir.path())), "ns").unwrap();
        assert_eq!(reopened.store(), library.store());
        assert!(dir.path().join("ns").join("presets.json").is_file());
    }

    #[test]
    fn reload_discards_unflushed_changes() {
        let mut library = PresetLibrary::in_memory();
        library.store_mut().create_bank("a").unwrap();
        library.flush().unwrap();
        library.store_mut().create_bank("b").unwrap();
        library.reload().unwrap();
        assert_eq!(library.store().bank_names(), vec!["a"]);
    }

    #[test]
    fn seeding_only_fills_empty_store() {
        let mut memory = MemoryStore::new();
        memory
            .set("ns", STORE_KEY, r#"{ "mine": {} }"#)
            .unwrap();
        let library = PresetLibrary::open_seeded(Box::new(memory), "ns").unwrap();
        assert_eq!(library.store().bank_names(), vec!["mine"]);

        let seeded = PresetLibrary::open_seeded(Box::new(MemoryStore::new()), "ns").unwrap();
        assert!(seeded.store().contains_bank(factory_presets::FACTORY_BANK));
    }

    /// Reads succeed, every write fails.
    struct ReadOnly;

    impl KeyValueStore for ReadOnly {
        fn get(&self, _namespace: &str, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }
        fn set(&mut self, _namespace: &str, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::InvalidKey(key.to_string()))
        }
        fn delete(&mut self, _namespace: &str, _key: &str) -> Result<bool, StoreError> {
            Ok(false)
        }
    }

    #[test]
    fn update_rolls_back_when_flush_fails() {
        let mut library = PresetLibrary::open(Box::new(ReadOnly), "ns").unwrap();
        let err = library
            .update(|store| store.put("lead", "clean", ChainSnapshot::new(0.5)))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey(_)));
        assert!(library.store().is_empty());
    }

    #[test]
    fn update_persists_accepted_changes() {
        let mut library = PresetLibrary::in_memory();
        library.update(|store| store.create_bank("a")).unwrap();
        assert!(library.update(|store| store.create_bank("a")).is_err());
        library.reload().unwrap();
        assert_eq!(library.store().bank_names(), vec!["a"]);
    }

    #[test]
    fn corrupt_document_is_an_error() {
        let mut memory = MemoryStore::new();
        memory.set("ns", STORE_KEY, "not json").unwrap();
        assert!(matches!(
            PresetLibrary::open(Box::new(memory), "ns"),
            Err(StoreError::Json(_))
        ));
    }
}
