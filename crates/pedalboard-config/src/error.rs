//! Error types for preset storage and settings.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the preset store and its persistence medium.
///
/// Name and deletion errors are reported before anything is mutated.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A sibling with that name already exists.
    #[error("{scope} '{name}' already exists")]
    NameCollision {
        /// `"bank"` or `"preset"`.
        scope: &'static str,
        /// The colliding name.
        name: String,
    },

    /// The name is empty or whitespace-only.
    #[error("invalid name '{0}': names must not be empty")]
    InvalidName(String),

    /// A bank still holding presets cannot be deleted.
    #[error("bank '{bank}' still holds {presets} preset(s)")]
    BankNotEmpty {
        /// Bank name.
        bank: String,
        /// Number of presets in it.
        presets: usize,
    },

    /// No bank with that name.
    #[error("bank not found: {0}")]
    BankNotFound(String),

    /// No preset with that name in the bank.
    #[error("preset '{preset}' not found in bank '{bank}'")]
    PresetNotFound {
        /// Bank name.
        bank: String,
        /// Preset name.
        preset: String,
    },

    /// A namespace or key cannot be mapped onto the medium.
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    /// The persistence medium failed.
    #[error("storage failure at '{path}': {source}")]
    Storage {
        /// Location on the medium.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The persisted blob is not a valid store.
    #[error("malformed preset store: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Create a name collision error.
    pub fn collision(scope: &'static str, name: impl Into<String>) -> Self {
        StoreError::NameCollision {
            scope,
            name: name.into(),
        }
    }

    /// Create a preset-not-found error.
    pub fn preset_not_found(bank: impl Into<String>, preset: impl Into<String>) -> Self {
        StoreError::PresetNotFound {
            bank: bank.into(),
            preset: preset.into(),
        }
    }

    /// Create a storage error.
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Storage {
            path: path.into(),
            source,
        }
    }
}

/// Errors from loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A setting holds an unusable value.
    #[error("invalid setting '{field}': {reason}")]
    InvalidSetting {
        /// Dotted setting name.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}
