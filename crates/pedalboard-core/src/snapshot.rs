//! Chain snapshot schema.
//!
//! A [`ChainSnapshot`] is an immutable value capturing a full chain
//! composition: the ordered unit types, each unit's opaque native state, and
//! the output level. Its JSON form is the persisted schema:
//!
//! ```text
//! { "units": [ { "type": "...", "nativeState": <any> } ], "outputLevel": <number> }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::level::MIX_DEFAULT;

/// One unit of a snapshot: its registry type and opaque state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    /// Registry type tag.
    #[serde(rename = "type")]
    pub unit_type: String,
    /// Opaque state as returned by the unit's `get_state`.
    #[serde(rename = "nativeState", default)]
    pub native_state: Value,
}

impl UnitRecord {
    /// Create a record.
    pub fn new(unit_type: impl Into<String>, native_state: Value) -> Self {
        Self {
            unit_type: unit_type.into(),
            native_state,
        }
    }
}

/// Full chain composition: units in order plus output level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSnapshot {
    /// Units in chain order.
    #[serde(default)]
    pub units: Vec<UnitRecord>,
    /// Output boundary level.
    #[serde(default = "default_output_level")]
    pub output_level: f64,
}

fn default_output_level() -> f64 {
    MIX_DEFAULT
}

impl ChainSnapshot {
    /// Empty snapshot with the given output level.
    pub fn new(output_level: f64) -> Self {
        Self {
            units: Vec::new(),
            output_level,
        }
    }

    /// Append a unit record.
    pub fn with_unit(mut self, record: UnitRecord) -> Self {
        self.units.push(record);
        self
    }

    /// Number of units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns `true` if the snapshot holds no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Unit types in chain order.
    pub fn unit_types(&self) -> Vec<&str> {
        self.units.iter().map(|u| u.unit_type.as_str()).collect()
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Default for ChainSnapshot {
    fn default() -> Self {
        Self::new(MIX_DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_uses_persisted_field_names() {
        let snap = ChainSnapshot::new(0.5).with_unit(UnitRecord::new("gain", json!({"gain": 0.2})));
        let value = serde_json::to_value(&snap).unwrap();
        assert_eq!(value["outputLevel"], json!(0.5));
        assert_eq!(value["units"][0]["type"], json!("gain"));
        assert_eq!(value["units"][0]["nativeState"]["gain"], json!(0.2));
    }

    #[test]
    fn parse_external_blob() {
        let blob = r#"{"units":[{"type":"delay","nativeState":[1,2,3]},{"type":"reverb","nativeState":null}],"outputLevel":0.25}"#;
        let snap = ChainSnapshot::from_json(blob).unwrap();
        assert_eq!(snap.unit_types(), vec!["delay", "reverb"]);
        assert_eq!(snap.units[0].native_state, json!([1, 2, 3]));
        assert!(snap.units[1].native_state.is_null());
        assert_eq!(snap.output_level, 0.25);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let snap = ChainSnapshot::from_json("{}").unwrap();
        assert!(snap.is_empty());
        assert_eq!(snap.output_level, MIX_DEFAULT);
        assert_eq!(snap, ChainSnapshot::default());
    }
}
