//! Native parameter descriptors and events.
//!
//! A [`NativeParam`] describes one parameter exactly as a unit exposes it.
//! The chain flattens these into its own host-facing namespace; units never
//! see flattened ids, only [`ParamEvent`]s carrying their own native id.
//!
//! # Normalization
//!
//! Host automation may send values normalized to \[0.0, 1.0\]. The mapping is
//! linear over `min..=max`; integer, boolean and choice parameters round to
//! the nearest step after denormalizing.
//!
//! ```rust
//! use pedalboard_core::NativeParam;
//!
//! let time = NativeParam::float("time", "Time", 10.0, 1010.0, 250.0);
//! assert_eq!(time.denormalize(0.5), 510.0);
//! assert_eq!(time.normalize(1010.0), 1.0);
//!
//! let mode = NativeParam::choice("mode", "Mode", &["clean", "crunch", "lead"], 0);
//! assert_eq!(mode.denormalize(0.6), 1.0);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Current parameter values of a unit, keyed by native parameter id.
pub type ParamValues = BTreeMap<String, f64>;

/// Value domain of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// Continuous value.
    #[default]
    Float,
    /// Whole numbers only.
    Int,
    /// 0.0 (off) or 1.0 (on).
    Boolean,
    /// Index into [`NativeParam::choices`].
    Choice,
}

impl ParamKind {
    /// Returns `true` for kinds that only take whole-number values.
    pub const fn is_stepped(self) -> bool {
        !matches!(self, ParamKind::Float)
    }

    /// Lowercase name, as used in serialized descriptors.
    pub const fn name(self) -> &'static str {
        match self {
            ParamKind::Float => "float",
            ParamKind::Int => "int",
            ParamKind::Boolean => "boolean",
            ParamKind::Choice => "choice",
        }
    }
}

/// A parameter as a unit exposes it directly, before flattening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeParam {
    /// Native id, unique within the unit.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Value domain.
    pub kind: ParamKind,
    /// Minimum plain value.
    pub min: f64,
    /// Maximum plain value.
    pub max: f64,
    /// Default plain value.
    pub default: f64,
    /// Choice labels for [`ParamKind::Choice`] parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    /// The unit itself expects normalized values for this parameter.
    #[serde(default)]
    pub normalized: bool,
}

impl NativeParam {
    /// Continuous parameter over `min..=max`.
    pub fn float(
        id: impl Into<String>,
        label: impl Into<String>,
        min: f64,
        max: f64,
        default: f64,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: ParamKind::Float,
            min,
            max,
            default,
            choices: Vec::new(),
            normalized: false,
        }
    }

    /// Integer parameter over `min..=max`.
    pub fn int(id: impl Into<String>, label: impl Into<String>, min: i64, max: i64, default: i64) -> Self {
        Self {
            kind: ParamKind::Int,
            ..Self::float(id, label, min as f64, max as f64, default as f64)
        }
    }

    /// On/off switch.
    pub fn boolean(id: impl Into<String>, label: impl Into<String>, default: bool) -> Self {
        Self {
            kind: ParamKind::Boolean,
            ..Self::float(id, label, 0.0, 1.0, if default { 1.0 } else { 0.0 })
        }
    }

    /// Enumerated parameter; the value is an index into `choices`.
    pub fn choice(
        id: impl Into<String>,
        label: impl Into<String>,
        choices: &[&str],
        default: usize,
    ) -> Self {
        let max = choices.len().saturating_sub(1) as f64;
        Self {
            kind: ParamKind::Choice,
            choices: choices.iter().map(|c| (*c).to_string()).collect(),
            ..Self::float(id, label, 0.0, max, (default as f64).min(max))
        }
    }

    /// Mark the parameter as natively normalized.
    pub fn with_normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    /// Range bounds in ascending order.
    ///
    /// Units report descriptors as they like: swapped bounds are reordered
    /// and a non-finite bound widens to the largest finite value on its side.
    pub fn bounds(&self) -> (f64, f64) {
        let lo = if self.min.is_finite() { self.min } else { f64::MIN };
        let hi = if self.max.is_finite() { self.max } else { f64::MAX };
        (lo.min(hi), lo.max(hi))
    }

    /// Clamp a plain value into range, rounding stepped kinds.
    pub fn clamp(&self, value: f64) -> f64 {
        let (lo, hi) = self.bounds();
        let v = value.clamp(lo, hi);
        if self.kind.is_stepped() { v.round() } else { v }
    }

    /// Map a plain value to \[0.0, 1.0\].
    pub fn normalize(&self, value: f64) -> f64 {
        let (lo, hi) = self.bounds();
        let range = hi - lo;
        if range < f64::EPSILON || !range.is_finite() {
            return 0.0;
        }
        ((self.clamp(value) - lo) / range).clamp(0.0, 1.0)
    }

    /// Map a normalized value back to the plain range.
    pub fn denormalize(&self, normalized: f64) -> f64 {
        let (lo, hi) = self.bounds();
        let n = if normalized.is_nan() { 0.0 } else { normalized.clamp(0.0, 1.0) };
        self.clamp(lo * (1.0 - n) + hi * n)
    }
}

/// A value change addressed to one native parameter of a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamEvent {
    /// Native parameter id.
    pub id: String,
    /// New value (plain, or normalized when `normalized` is set).
    pub value: f64,
    /// Host time in seconds at which the value should be reached.
    /// `None` means "now".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    /// `value` is normalized to \[0.0, 1.0\].
    #[serde(default)]
    pub normalized: bool,
}

impl ParamEvent {
    /// Immediate plain-value change.
    pub fn new(id: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            value,
            time: None,
            normalized: false,
        }
    }

    /// Schedule the change at host time `time` (seconds).
    pub fn at(mut self, time: f64) -> Self {
        self.time = Some(time);
        self
    }

    /// Mark `value` as normalized.
    pub fn normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }
}
