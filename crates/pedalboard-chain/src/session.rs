//! A pedalboard bound to a preset library.
//!
//! Every store mutation made through a [`Session`] is flushed to the
//! library's medium before the call returns. A mutation that is rejected,
//! or that the medium fails to persist, leaves both the store and the
//! medium untouched.

use std::sync::Arc;

use pedalboard_config::{PresetInfo, PresetLibrary, PresetStore, snapshot_issues};

use crate::board::Pedalboard;
use crate::error::ChainError;
use crate::state::RestoreReport;

/// Save/load front end over a [`Pedalboard`] and a [`PresetLibrary`].
#[derive(Debug)]
pub struct Session {
    board: Arc<Pedalboard>,
    library: PresetLibrary,
}

impl Session {
    /// Bind `board` to `library`.
    pub fn new(board: Arc<Pedalboard>, library: PresetLibrary) -> Self {
        Self { board, library }
    }

    /// The live pedalboard.
    pub fn board(&self) -> &Arc<Pedalboard> {
        &self.board
    }

    /// The preset store.
    pub fn store(&self) -> &PresetStore {
        self.library.store()
    }

    /// The underlying library.
    pub fn library(&self) -> &PresetLibrary {
        &self.library
    }

    /// Capture the chain into `bank`/`preset`, creating either if absent and
    /// overwriting an existing preset.
    pub async fn save(&mut self, bank: &str, preset: &str) -> Result<(), ChainError> {
        let snapshot = self.board.get_state().await?;
        let units = snapshot.len();
        self.library.update(|store| store.put(bank, preset, snapshot))?;
        tracing::info!(bank, preset, units, "preset saved");
        Ok(())
    }

    /// Replace the chain with the snapshot stored at `bank`/`preset`.
    pub async fn load(&self, bank: &str, preset: &str) -> Result<RestoreReport, ChainError> {
        let snapshot = self.library.store().get(bank, preset)?.clone();
        for issue in snapshot_issues(&snapshot, self.board.registry()) {
            tracing::warn!(bank, preset, %issue, "loading preset with issue");
        }
        let report = self.board.set_state(&snapshot).await?;
        tracing::info!(
            bank,
            preset,
            restored = report.restored.len(),
            failed = report.failures.len(),
            "preset loaded"
        );
        Ok(report)
    }

    /// Create an empty bank.
    pub fn create_bank(&mut self, name: &str) -> Result<(), ChainError> {
        Ok(self.library.update(|store| store.create_bank(name))?)
    }

    /// Create a preset holding an empty chain.
    pub fn create_preset(&mut self, bank: &str, name: &str) -> Result<(), ChainError> {
        Ok(self.library.update(|store| store.create_preset(bank, name))?)
    }

    /// Rename a bank.
    pub fn rename_bank(&mut self, old: &str, new: &str) -> Result<(), ChainError> {
        Ok(self.library.update(|store| store.rename_bank(old, new))?)
    }

    /// Rename a preset within its bank.
    pub fn rename_preset(&mut self, bank: &str, old: &str, new: &str) -> Result<(), ChainError> {
        Ok(self.library.update(|store| store.rename_preset(bank, old, new))?)
    }

    /// Delete a preset. Returns whether it existed; a missing one is a no-op.
    pub fn delete_preset(&mut self, bank: &str, preset: &str) -> Result<bool, ChainError> {
        if !self.library.store().contains_preset(bank, preset) {
            return Ok(false);
        }
        Ok(self
            .library
            .update(|store| Ok(store.delete_preset(bank, preset)))?)
    }

    /// Delete an empty bank.
    pub fn delete_bank(&mut self, bank: &str) -> Result<(), ChainError> {
        Ok(self.library.update(|store| store.delete_bank(bank))?)
    }

    /// Display summary of one preset.
    pub fn preset_info(&self, bank: &str, preset: &str) -> Result<PresetInfo, ChainError> {
        Ok(self.library.store().preset_info(bank, preset)?)
    }

    /// Bank names, sorted.
    pub fn bank_names(&self) -> Vec<&str> {
        self.library.store().bank_names()
    }

    /// Preset names of one bank, sorted.
    pub fn preset_names(&self, bank: &str) -> Result<Vec<&str>, ChainError> {
        Ok(self.library.store().preset_names(bank)?)
    }
}
