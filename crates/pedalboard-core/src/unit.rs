//! The unit capability trait.
//!
//! A [`Unit`] is an opaque processing instance. The chain never looks inside
//! it: it only routes signal through it, queries its parameters, forwards
//! automation to it and captures/restores its opaque state.
//!
//! Every query crosses the unit's own execution boundary, so all capability
//! methods that talk to the unit are `async` and must be awaited. Methods take
//! `&self`; implementations own whatever synchronization their processor
//! needs, which lets the chain hand out cheap `Arc<dyn Unit>` handles to
//! concurrent readers.

use core::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::param::{NativeParam, ParamEvent, ParamValues};

/// Chain-assigned identifier of a unit instance.
///
/// Ids are handed out monotonically by the chain manager and are never reused
/// after the unit is removed, so an id captured before a removal can never
/// address a different unit afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u64);

impl UnitId {
    /// Raw numeric value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Audio port capability of a unit.
///
/// A unit must accept input and produce output to sit in a serial chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortLayout {
    /// Number of audio inputs.
    pub inputs: u32,
    /// Number of audio outputs.
    pub outputs: u32,
}

impl PortLayout {
    /// One input, one output: the usual insert effect.
    pub const EFFECT: Self = Self {
        inputs: 1,
        outputs: 1,
    };

    /// Output only (instrument or generator). Cannot be chained.
    pub const SOURCE: Self = Self {
        inputs: 0,
        outputs: 1,
    };

    /// Returns `true` if the unit can be wired between two chain neighbours.
    pub const fn is_routable(self) -> bool {
        self.inputs > 0 && self.outputs > 0
    }
}

impl Default for PortLayout {
    fn default() -> Self {
        Self::EFFECT
    }
}

/// Errors reported by a unit across its execution boundary.
#[derive(Debug, Error)]
pub enum UnitError {
    /// The unit refused the request.
    #[error("unit '{unit_type}' rejected request: {reason}")]
    Rejected {
        /// Type tag of the unit.
        unit_type: String,
        /// Unit-provided explanation.
        reason: String,
    },

    /// The unit could not apply an opaque state blob.
    #[error("unit '{unit_type}' cannot apply state: {reason}")]
    InvalidState {
        /// Type tag of the unit.
        unit_type: String,
        /// Why the state was refused.
        reason: String,
    },

    /// An event addressed a native parameter the unit does not have.
    #[error("unit '{unit_type}' has no parameter '{param}'")]
    UnknownParameter {
        /// Type tag of the unit.
        unit_type: String,
        /// Native parameter id that was addressed.
        param: String,
    },

    /// The unit's execution context is gone (destroyed or crashed).
    #[error("unit '{0}' is disconnected")]
    Disconnected(String),

    /// State (de)serialization failed inside the unit.
    #[error("unit state serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl UnitError {
    /// Create a rejection error.
    pub fn rejected(unit_type: impl Into<String>, reason: impl Into<String>) -> Self {
        UnitError::Rejected {
            unit_type: unit_type.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid-state error.
    pub fn invalid_state(unit_type: impl Into<String>, reason: impl Into<String>) -> Self {
        UnitError::InvalidState {
            unit_type: unit_type.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown-parameter error.
    pub fn unknown_parameter(unit_type: impl Into<String>, param: impl Into<String>) -> Self {
        UnitError::UnknownParameter {
            unit_type: unit_type.into(),
            param: param.into(),
        }
    }
}

/// Object-safe capability set of a processing unit.
///
/// # Lifecycle
///
/// The registry creates a unit, the chain manager inserts it and owns it
/// while it is present, and calls [`destroy`](Self::destroy) exactly once
/// after disconnecting it when it is pruned.
///
/// # Example
///
/// ```rust
/// use pedalboard_core::{
///     async_trait, NativeParam, ParamEvent, ParamValues, Unit, UnitError,
/// };
/// use serde_json::Value;
/// use std::sync::Mutex;
///
/// struct Volume {
///     level: Mutex<f64>,
/// }
///
/// #[async_trait]
/// impl Unit for Volume {
///     fn type_name(&self) -> &str {
///         "volume"
///     }
///
///     async fn parameter_info(&self) -> Result<Vec<NativeParam>, UnitError> {
///         Ok(vec![NativeParam::float("level", "Level", 0.0, 1.0, 1.0)])
///     }
///
///     async fn parameter_values(&self) -> Result<ParamValues, UnitError> {
///         let level = *self.level.lock().unwrap();
///         Ok(ParamValues::from([("level".to_string(), level)]))
///     }
///
///     async fn schedule_event(&self, event: ParamEvent) -> Result<(), UnitError> {
///         *self.level.lock().unwrap() = event.value;
///         Ok(())
///     }
///
///     async fn get_state(&self) -> Result<Value, UnitError> {
///         Ok(serde_json::json!({ "level": *self.level.lock().unwrap() }))
///     }
///
///     async fn set_state(&self, state: &Value) -> Result<(), UnitError> {
///         let level = state["level"]
///             .as_f64()
///             .ok_or_else(|| UnitError::invalid_state("volume", "missing level"))?;
///         *self.level.lock().unwrap() = level;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Unit: Send + Sync {
    /// Type tag used by the registry to recreate this unit.
    fn type_name(&self) -> &str;

    /// Audio port layout. Defaults to one input and one output.
    fn ports(&self) -> PortLayout {
        PortLayout::EFFECT
    }

    /// Native parameter descriptors in the unit's own order.
    async fn parameter_info(&self) -> Result<Vec<NativeParam>, UnitError>;

    /// Current values keyed by native parameter id.
    async fn parameter_values(&self) -> Result<ParamValues, UnitError>;

    /// Apply (or queue, when `event.time` is set) a native parameter change.
    async fn schedule_event(&self, event: ParamEvent) -> Result<(), UnitError>;

    /// Drop every queued, not yet applied event.
    async fn clear_events(&self) {}

    /// Capture the unit's opaque state.
    async fn get_state(&self) -> Result<Value, UnitError>;

    /// Replace the unit's state with a previously captured blob.
    async fn set_state(&self, state: &Value) -> Result<(), UnitError>;

    /// Processing latency the unit adds, in samples.
    fn latency_samples(&self) -> u32 {
        0
    }

    /// Release the unit's execution context. Called once, after disconnection.
    async fn destroy(&self) {}
}
