//! Two-level bank/preset store.
//!
//! The store maps bank names to banks and each bank maps preset names to
//! [`ChainSnapshot`]s. Names are trimmed, must be non-empty and are unique
//! among siblings. Lookups trim too, so a name is found by the same string
//! it was stored under. Every rejected operation leaves the store unchanged.
//!
//! # JSON Format
//!
//! ```json
//! { "lead": { "clean": { "units": [], "outputLevel": 1.0 } } }
//! ```

use std::collections::BTreeMap;

use pedalboard_core::ChainSnapshot;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Preset name → snapshot.
pub type Bank = BTreeMap<String, ChainSnapshot>;

/// Summary of one preset for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetInfo {
    /// Bank name.
    pub bank: String,
    /// Preset name.
    pub preset: String,
    /// Unit types in chain order.
    pub unit_types: Vec<String>,
    /// Stored output level.
    pub output_level: f64,
}

/// Trim a name and reject it if nothing is left.
pub fn validate_name(name: &str) -> Result<&str, StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(trimmed)
}

/// Lookup key for a bank or preset name.
fn key(name: &str) -> &str {
    name.trim()
}

/// All banks, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetStore {
    banks: BTreeMap<String, Bank>,
}

impl PresetStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the persisted JSON form.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to the persisted JSON form.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns `true` if there are no banks.
    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    /// Bank names, sorted.
    pub fn bank_names(&self) -> Vec<&str> {
        self.banks.keys().map(String::as_str).collect()
    }

    /// Preset names of one bank, sorted.
    pub fn preset_names(&self, bank: &str) -> Result<Vec<&str>, StoreError> {
        Ok(self.bank(bank)?.keys().map(String::as_str).collect())
    }

    /// Returns `true` if the bank exists.
    pub fn contains_bank(&self, bank: &str) -> bool {
        self.banks.contains_key(key(bank))
    }

    /// Returns `true` if the preset exists.
    pub fn contains_preset(&self, bank: &str, preset: &str) -> bool {
        self.banks
            .get(key(bank))
            .is_some_and(|b| b.contains_key(key(preset)))
    }

    /// Borrow a bank.
    pub fn bank(&self, bank: &str) -> Result<&Bank, StoreError> {
        let bank = key(bank);
        self.banks
            .get(bank)
            .ok_or_else(|| StoreError::BankNotFound(bank.to_string()))
    }

    /// Borrow a preset's snapshot.
    pub fn get(&self, bank: &str, preset: &str) -> Result<&ChainSnapshot, StoreError> {
        let preset = key(preset);
        self.bank(bank)?
            .get(preset)
            .ok_or_else(|| StoreError::preset_not_found(key(bank), preset))
    }

    /// Store a snapshot, creating the bank and preset if absent and
    /// overwriting the preset if present.
    pub fn put(&mut self, bank: &str, preset: &str, snapshot: ChainSnapshot) -> Result<(), StoreError> {
        let bank = validate_name(bank)?;
        let preset = validate_name(preset)?;
        self.banks
            .entry(bank.to_string())
            .or_default()
            .insert(preset.to_string(), snapshot);
        Ok(())
    }

    /// Create an empty bank.
    pub fn create_bank(&mut self, name: &str) -> Result<(), StoreError> {
        let name = validate_name(name)?;
        if self.banks.contains_key(name) {
            return Err(StoreError::collision("bank", name));
        }
        self.banks.insert(name.to_string(), Bank::new());
        Ok(())
    }

    /// Create a preset holding an empty chain.
    pub fn create_preset(&mut self, bank: &str, name: &str) -> Result<(), StoreError> {
        let bank = key(bank);
        let name = validate_name(name)?;
        let presets = self
            .banks
            .get_mut(bank)
            .ok_or_else(|| StoreError::BankNotFound(bank.to_string()))?;
        if presets.contains_key(name) {
            return Err(StoreError::collision("preset", name));
        }
        presets.insert(name.to_string(), ChainSnapshot::default());
        Ok(())
    }

    /// Rename a bank. Renaming to the current name succeeds without change.
    pub fn rename_bank(&mut self, old: &str, new: &str) -> Result<(), StoreError> {
        let old = key(old);
        if !self.banks.contains_key(old) {
            return Err(StoreError::BankNotFound(old.to_string()));
        }
        let new = validate_name(new)?;
        if new == old {
            return Ok(());
        }
        if self.banks.contains_key(new) {
            return Err(StoreError::collision("bank", new));
        }
        if let Some(presets) = self.banks.remove(old) {
            self.banks.insert(new.to_string(), presets);
        }
        Ok(())
    }

    /// Rename a preset within its bank. Renaming to the current name succeeds
    /// without change.
    pub fn rename_preset(&mut self, bank: &str, old: &str, new: &str) -> Result<(), StoreError> {
        let (bank, old) = (key(bank), key(old));
        let presets = self
            .banks
            .get_mut(bank)
            .ok_or_else(|| StoreError::BankNotFound(bank.to_string()))?;
        if !presets.contains_key(old) {
            return Err(StoreError::preset_not_found(bank, old));
        }
        let new = validate_name(new)?;
        if new == old {
            return Ok(());
        }
        if presets.contains_key(new) {
            return Err(StoreError::collision("preset", new));
        }
        if let Some(snapshot) = presets.remove(old) {
            presets.insert(new.to_string(), snapshot);
        }
        Ok(())
    }

    /// Delete a preset. A missing bank or preset is a no-op.
    /// Returns whether something was removed.
    pub fn delete_preset(&mut self, bank: &str, preset: &str) -> bool {
        self.banks
            .get_mut(key(bank))
            .is_some_and(|b| b.remove(key(preset)).is_some())
    }

    /// Delete an empty bank.
    pub fn delete_bank(&mut self, bank: &str) -> Result<(), StoreError> {
        let bank = key(bank);
        let presets = self.bank(bank)?.len();
        if presets > 0 {
            return Err(StoreError::BankNotEmpty {
                bank: bank.to_string(),
                presets,
            });
        }
        self.banks.remove(bank);
        Ok(())
    }

    /// Display summary of a preset.
    pub fn preset_info(&self, bank: &str, preset: &str) -> Result<PresetInfo, StoreError> {
        let snapshot = self.get(bank, preset)?;
        Ok(PresetInfo {
            bank: key(bank).to_string(),
            preset: key(preset).to_string(),
            unit_types: snapshot.units.iter().map(|u| u.unit_type.clone()).collect(),
            output_level: snapshot.output_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedalboard_core::UnitRecord;
    use serde_json::json;

    fn store_with_lead() -> PresetStore {
        let mut store = PresetStore::new();
        store
            .put(
                "lead",
                "clean",
                ChainSnapshot::new(0.8).with_unit(UnitRecord::new("gain", json!({"gain": 3.0}))),
            )
            .unwrap();
        store
    }

    #[test]
    fn put_creates_bank_and_preset() {
        let store = store_with_lead();
        assert_eq!(store.bank_names(), vec!["lead"]);
        assert_eq!(store.preset_names("lead").unwrap(), vec!["clean"]);
        assert_eq!(store.get("lead", "clean").unwrap().output_level, 0.8);
    }

    #[test]
    fn put_overwrites() {
        let mut store = store_with_lead();
        store.put("lead", "clean", ChainSnapshot::new(0.1)).unwrap();
        assert!(store.get("lead", "clean").unwrap().is_empty());
        assert_eq!(store.preset_names("lead").unwrap().len(), 1);
    }

    #[test]
    fn names_are_trimmed_and_validated() {
        let mut store = PresetStore::new();
        store.create_bank("  rhythm ").unwrap();
        assert!(store.contains_bank("rhythm"));
        assert!(matches!(store.create_bank("   "), Err(StoreError::InvalidName(_))));
        assert!(matches!(
            store.create_bank("rhythm"),
            Err(StoreError::NameCollision { scope: "bank", .. })
        ));
        assert!(matches!(store.put("", "x", ChainSnapshot::default()), Err(StoreError::InvalidName(_))));
    }

    #[test]
    fn lookups_trim_like_put() {
        let mut store = PresetStore::new();
        store.put(" lead ", " clean", ChainSnapshot::new(0.5)).unwrap();
        assert_eq!(store.bank_names(), vec!["lead"]);
        assert_eq!(store.get(" lead ", " clean").unwrap().output_level, 0.5);
        assert!(store.contains_preset("lead ", "clean "));
        assert_eq!(store.preset_info(" lead", "clean").unwrap().bank, "lead");

        store.rename_preset(" lead ", " clean", "dirty").unwrap();
        assert!(store.contains_preset("lead", "dirty"));
        assert!(store.delete_preset(" lead ", " dirty "));
        store.rename_bank(" lead ", "solo").unwrap();
        store.delete_bank(" solo ").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn create_preset_requires_bank() {
        let mut store = store_with_lead();
        assert!(matches!(store.create_preset("nope", "x"), Err(StoreError::BankNotFound(_))));
        store.create_preset("lead", "dirty").unwrap();
        assert_eq!(store.get("lead", "dirty").unwrap(), &ChainSnapshot::default());
        assert!(matches!(
            store.create_preset("lead", "dirty"),
            Err(StoreError::NameCollision { scope: "preset", .. })
        ));
    }

    #[test]
    fn rename_rules() {
        let mut store = store_with_lead();
        store.create_preset("lead", "dirty").unwrap();
        let before = store.clone();

        assert!(matches!(store.rename_preset("lead", "clean", " "), Err(StoreError::InvalidName(_))));
        assert!(matches!(
            store.rename_preset("lead", "clean", "dirty"),
            Err(StoreError::NameCollision { .. })
        ));
        assert_eq!(store, before);

        store.rename_preset("lead", "clean", "clean").unwrap();
        assert_eq!(store, before);

        store.rename_preset("lead", "clean", "sparkle").unwrap();
        assert!(store.contains_preset("lead", "sparkle"));
        assert!(!store.contains_preset("lead", "clean"));

        store.create_bank("rhythm").unwrap();
        assert!(matches!(store.rename_bank("lead", "rhythm"), Err(StoreError::NameCollision { .. })));
        store.rename_bank("lead", "lead").unwrap();
        store.rename_bank("lead", "solo").unwrap();
        assert_eq!(store.bank_names(), vec!["rhythm", "solo"]);
        assert!(matches!(store.rename_bank("lead", "x"), Err(StoreError::BankNotFound(_))));
    }

    #[test]
    fn delete_rules() {
        let mut store = store_with_lead();
        assert!(matches!(
            store.delete_bank("lead"),
            Err(StoreError::BankNotEmpty { presets: 1, .. })
        ));
        assert!(store.contains_preset("lead", "clean"));

        assert!(!store.delete_preset("lead", "missing"));
        assert!(!store.delete_preset("nope", "clean"));
        assert!(store.delete_preset("lead", "clean"));
        store.delete_bank("lead").unwrap();
        assert!(store.is_empty());
        assert!(matches!(store.delete_bank("lead"), Err(StoreError::BankNotFound(_))));
    }

    #[test]
    fn preset_info_lists_units() {
        let store = store_with_lead();
        let info = store.preset_info("lead", "clean").unwrap();
        assert_eq!(info.unit_types, vec!["gain"]);
        assert_eq!(info.output_level, 0.8);
        assert!(matches!(store.preset_info("lead", "x"), Err(StoreError::PresetNotFound { .. })));
    }

    #[test]
    fn json_schema() {
        let store = store_with_lead();
        let value: serde_json::Value = serde_json::from_str(&store.to_json().unwrap()).unwrap();
        assert_eq!(value["lead"]["clean"]["outputLevel"], json!(0.8));
        assert_eq!(value["lead"]["clean"]["units"][0]["type"], json!("gain"));
        assert_eq!(PresetStore::from_json(&store.to_json().unwrap()).unwrap(), store);
    }
}
