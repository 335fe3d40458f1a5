//! Preset banks, persistence and settings for the pedalboard chain host.
//!
//! # Features
//!
//! - **Preset Store**: Two-level bank/preset map of chain snapshots
//! - **Persistence**: Pluggable key-value media, in memory or on disk
//! - **Validation**: Check snapshots against a unit registry
//! - **Settings**: TOML host settings with platform default paths
//! - **Factory Presets**: Built-in presets seeded into an empty store
//!
//! # Example
//!
//! ```rust
//! use pedalboard_config::{PresetLibrary, StoreError};
//! use pedalboard_core::ChainSnapshot;
//!
//! let mut library = PresetLibrary::in_memory();
//! let store = library.store_mut();
//! store.create_bank("Live").unwrap();
//! store.put("Live", "Verse", ChainSnapshot::new(0.8)).unwrap();
//!
//! // A non-empty bank cannot be deleted
//! assert!(matches!(store.delete_bank("Live"), Err(StoreError::BankNotEmpty { .. })));
//! library.flush().unwrap();
//! ```

pub mod error;
pub mod factory_presets;
pub mod library;
pub mod medium;
pub mod paths;
pub mod settings;
pub mod store;
pub mod validation;

pub use error::{ConfigError, StoreError};
pub use factory_presets::{FACTORY_BANK, factory_preset_names, factory_presets, get_factory_preset};
pub use library::{PresetLibrary, STORE_KEY};
pub use medium::{FileStore, KeyValueStore, MemoryStore};
pub use paths::{default_config_path, default_store_dir, ensure_dir, user_config_dir};
pub use settings::{ChainSettings, DEFAULT_NAMESPACE, PedalboardConfig, StorageSettings};
pub use store::{Bank, PresetInfo, PresetStore, validate_name};
pub use validation::{ValidationError, snapshot_issues};
