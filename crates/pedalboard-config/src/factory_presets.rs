//! Factory presets bundled with the library.
//!
//! These are embedded at compile time and seeded into an empty store so a
//! fresh installation has something to load. They only use built-in units.

use pedalboard_core::ChainSnapshot;

use crate::store::PresetStore;

/// Bank the factory presets are seeded into.
pub const FACTORY_BANK: &str = "Factory";

/// JSON snapshots of the factory presets.
static FACTORY_PRESETS_JSON: &[(&str, &str)] = &[
    ("Init", INIT_PRESET),
    ("Crunch", CRUNCH_PRESET),
    ("Ambient", AMBIENT_PRESET),
    ("Pulse", PULSE_PRESET),
    ("Slapback", SLAPBACK_PRESET),
];

/// Empty chain at unity.
const INIT_PRESET: &str = r#"{ "units": [], "outputLevel": 1.0 }"#;

/// Boosted overdrive.
const CRUNCH_PRESET: &str = r#"{
  "units": [
    { "type": "gain", "nativeState": { "gain": 6.0 } },
    { "type": "overdrive", "nativeState": { "drive": 0.65, "tone": 0.55, "level": 0.6 } }
  ],
  "outputLevel": 0.9
}"#;

/// Long delay into a hall.
const AMBIENT_PRESET: &str = r#"{
  "units": [
    { "type": "delay", "nativeState": { "time": 480.0, "feedback": 0.55, "mix": 0.35 } },
    { "type": "reverb", "nativeState": { "size": 0.85, "decay": 6.0, "mix": 0.4, "mode": 1.0 } }
  ],
  "outputLevel": 0.85
}"#;

/// Square-wave tremolo into the limiter.
const PULSE_PRESET: &str = r#"{
  "units": [
    { "type": "tremolo", "nativeState": { "rate": 6.0, "depth": 0.8, "wave": 2.0, "sync": 0.0 } },
    { "type": "limiter", "nativeState": { "ceiling": -1.0, "release": 80.0, "lookahead": 1.0 } }
  ],
  "outputLevel": 1.0
}"#;

/// Single short echo.
const SLAPBACK_PRESET: &str = r#"{
  "units": [
    { "type": "delay", "nativeState": { "time": 110.0, "feedback": 0.1, "mix": 0.4 } }
  ],
  "outputLevel": 1.0
}"#;

/// Names of all factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_JSON.iter().map(|(name, _)| *name).collect()
}

/// All factory presets, by name.
pub fn factory_presets() -> Vec<(&'static str, ChainSnapshot)> {
    FACTORY_PRESETS_JSON
        .iter()
        .filter_map(|(name, json)| ChainSnapshot::from_json(json).ok().map(|s| (*name, s)))
        .collect()
}

/// Get a factory preset by name (case-insensitive).
pub fn get_factory_preset(name: &str) -> Option<ChainSnapshot> {
    FACTORY_PRESETS_JSON
        .iter()
        .find(|(preset, _)| preset.eq_ignore_ascii_case(name))
        .and_then(|(_, json)| ChainSnapshot::from_json(json).ok())
}

/// Copy every factory preset into `store` under [`FACTORY_BANK`].
///
/// Presets already present are left alone. Returns how many were added.
pub fn seed(store: &mut PresetStore) -> usize {
    let mut added = 0;
    for (name, snapshot) in factory_presets() {
        if store.contains_preset(FACTORY_BANK, name) {
            continue;
        }
        if store.put(FACTORY_BANK, name, snapshot).is_ok() {
            added += 1;
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedalboard_registry::UnitRegistry;

    use crate::validation::snapshot_issues;

    #[test]
    fn all_factory_presets_parse() {
        assert_eq!(factory_presets().len(), FACTORY_PRESETS_JSON.len());
    }

    #[test]
    fn all_factory_presets_validate() {
        let registry = UnitRegistry::new();
        for (name, snapshot) in factory_presets() {
            let issues = snapshot_issues(&snapshot, &registry);
            assert!(issues.is_empty(), "factory preset {name} invalid: {issues:?}");
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let crunch = get_factory_preset("crunch").unwrap();
        assert_eq!(crunch.unit_types(), vec!["gain", "overdrive"]);
        assert!(get_factory_preset("nonexistent").is_none());
        assert_eq!(factory_preset_names()[0], "Init");
    }

    #[test]
    fn seeding_is_idempotent() {
        let mut store = PresetStore::new();
        assert_eq!(seed(&mut store), FACTORY_PRESETS_JSON.len());
        assert_eq!(seed(&mut store), 0);
        assert_eq!(store.bank_names(), vec![FACTORY_BANK]);
    }
}
