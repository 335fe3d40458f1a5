//! Shared state for CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use pedalboard_chain::{Pedalboard, Session};
use pedalboard_config::{PedalboardConfig, PresetLibrary};
use pedalboard_registry::UnitRegistry;

/// Resolved settings and the unit registry.
pub struct Context {
    pub config: PedalboardConfig,
    pub registry: Arc<UnitRegistry>,
}

impl Context {
    /// Load settings and apply command-line overrides.
    pub fn load(
        config_path: Option<&Path>,
        store: Option<PathBuf>,
        namespace: Option<String>,
    ) -> anyhow::Result<Self> {
        let mut config = PedalboardConfig::load_or_default(config_path)
            .context("failed to load settings")?;
        if let Some(dir) = store {
            config.storage.dir = Some(dir);
        }
        if let Some(ns) = namespace {
            config.storage.namespace = ns;
        }
        config.validate()?;
        tracing::debug!(store = %config.storage.resolved_dir().display(), "settings resolved");
        Ok(Self {
            config,
            registry: Arc::new(UnitRegistry::new()),
        })
    }

    /// Open the preset library described by the settings.
    pub fn library(&self) -> anyhow::Result<PresetLibrary> {
        PresetLibrary::from_settings(&self.config.storage).with_context(|| {
            format!(
                "failed to open preset store at {}",
                self.config.storage.resolved_dir().display()
            )
        })
    }

    /// Fresh, empty pedalboard.
    pub fn board(&self) -> Arc<Pedalboard> {
        Arc::new(Pedalboard::with_output_level(
            Arc::clone(&self.registry),
            self.config.chain.default_output_level,
        ))
    }

    /// Fresh pedalboard bound to the preset library.
    pub fn session(&self) -> anyhow::Result<Session> {
        Ok(Session::new(self.board(), self.library()?))
    }
}
