//! Platform-specific paths for settings and the preset store.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/pedalboard/` (Linux), `~/Library/Application Support/pedalboard/` (macOS), `%APPDATA%\pedalboard\` (Windows)
//! - **Settings file**: `<user config>/config.toml`
//! - **Preset store**: `<user config>/store/`

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Application name used for directory paths.
const APP_NAME: &str = "pedalboard";

/// Subdirectory holding the file-backed preset store.
const STORE_SUBDIR: &str = "store";

/// Settings file name.
const CONFIG_FILE: &str = "config.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default root of the file-backed preset store.
pub fn default_store_dir() -> PathBuf {
    user_config_dir().join(STORE_SUBDIR)
}

/// Default settings file.
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}

/// Ensure a directory exists, creating it and its parents if needed.
pub fn ensure_dir(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| ConfigError::create_dir(path, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_end_with_app_name() {
        assert!(user_config_dir().ends_with(APP_NAME));
        assert!(default_store_dir().ends_with("pedalboard/store"));
        assert!(default_config_path().ends_with("pedalboard/config.toml"));
    }

    #[test]
    fn ensure_dir_creates_nested() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir(&nested).unwrap();
    }
}
