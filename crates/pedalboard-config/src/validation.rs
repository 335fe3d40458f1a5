//! Snapshot validation.
//!
//! Checks a [`ChainSnapshot`] against a [`UnitRegistry`] before it is stored
//! or loaded: every unit type must be registered and the output level must
//! be in range. Unit states are opaque and are not inspected.
//!
//! # Example
//!
//! ```rust
//! use pedalboard_config::validation::{ValidationError, snapshot_issues};
//! use pedalboard_core::{ChainSnapshot, UnitRecord};
//! use pedalboard_registry::UnitRegistry;
//!
//! let registry = UnitRegistry::new();
//! let snapshot = ChainSnapshot::new(0.9)
//!     .with_unit(UnitRecord::new("delay", serde_json::json!({})))
//!     .with_unit(UnitRecord::new("kazoo", serde_json::Value::Null));
//! assert_eq!(
//!     snapshot_issues(&snapshot, &registry),
//!     vec![ValidationError::UnknownUnitType { index: 1, unit_type: "kazoo".into() }]
//! );
//! ```

use pedalboard_core::{ChainSnapshot, MIX_MAX, MIX_MIN};
use pedalboard_registry::UnitRegistry;
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A unit type is not registered.
    #[error("unit {index}: unknown unit type '{unit_type}'")]
    UnknownUnitType {
        /// Position in the snapshot.
        index: usize,
        /// Recorded type.
        unit_type: String,
    },

    /// Output level outside its range or not a number.
    #[error("output level {0} out of range [{MIX_MIN}, {MIX_MAX}]")]
    OutputLevelOutOfRange(f64),
}

/// Every problem found in a snapshot, in snapshot order.
pub fn snapshot_issues(snapshot: &ChainSnapshot, registry: &UnitRegistry) -> Vec<ValidationError> {
    let mut issues: Vec<ValidationError> = snapshot
        .units
        .iter()
        .enumerate()
        .filter(|(_, u)| !registry.contains(&u.unit_type))
        .map(|(index, u)| ValidationError::UnknownUnitType {
            index,
            unit_type: u.unit_type.clone(),
        })
        .collect();

    let level = snapshot.output_level;
    if !(MIX_MIN..=MIX_MAX).contains(&level) {
        issues.push(ValidationError::OutputLevelOutOfRange(level));
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedalboard_core::UnitRecord;
    use serde_json::json;

    #[test]
    fn reports_unknown_types_in_order() {
        let registry = UnitRegistry::new();
        let snap = ChainSnapshot::new(1.0)
            .with_unit(UnitRecord::new("kazoo", json!(null)))
            .with_unit(UnitRecord::new("gain", json!({})))
            .with_unit(UnitRecord::new("theremin", json!(null)));
        let issues = snapshot_issues(&snap, &registry);
        assert_eq!(
            issues,
            vec![
                ValidationError::UnknownUnitType {
                    index: 0,
                    unit_type: "kazoo".into()
                },
                ValidationError::UnknownUnitType {
                    index: 2,
                    unit_type: "theremin".into()
                },
            ]
        );
    }

    #[test]
    fn rejects_out_of_range_level() {
        let registry = UnitRegistry::new();
        let issues = snapshot_issues(&ChainSnapshot::new(1.5), &registry);
        assert_eq!(issues[0].to_string(), "output level 1.5 out of range [0, 1]");
        assert_eq!(snapshot_issues(&ChainSnapshot::new(f64::NAN), &registry).len(), 1);
    }

    #[test]
    fn empty_snapshot_is_valid() {
        assert!(snapshot_issues(&ChainSnapshot::default(), &UnitRegistry::empty()).is_empty());
    }
}
