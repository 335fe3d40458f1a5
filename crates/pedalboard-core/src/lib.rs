//! Pedalboard Core - unit, parameter and snapshot types for the chain host.
//!
//! This crate defines the vocabulary shared by every other pedalboard crate.
//! It carries no orchestration logic of its own.
//!
//! # Core Abstractions
//!
//! ## Units
//!
//! - [`Unit`] - Object-safe async capability trait for a plugin instance
//! - [`UnitId`] - Chain-assigned instance id, never reused
//! - [`PortLayout`] - Input/output capability of a unit
//!
//! ## Parameters
//!
//! - [`NativeParam`] - A parameter as a unit exposes it, before flattening
//! - [`ParamEvent`] - A value change addressed to a unit's native parameter
//!
//! ## Snapshots
//!
//! - [`ChainSnapshot`] - Unit types, opaque unit states and output level
//! - [`UnitRecord`] - One entry of a snapshot
//!
//! ## Output Level
//!
//! - [`LevelRamp`] - Time-based linear ramp used by the output boundary
//!
//! # Example
//!
//! ```rust
//! use pedalboard_core::{ChainSnapshot, UnitRecord};
//!
//! let snapshot = ChainSnapshot::new(0.8)
//!     .with_unit(UnitRecord::new("overdrive", serde_json::json!({ "drive": 0.7 })));
//!
//! let json = serde_json::to_string(&snapshot).unwrap();
//! assert!(json.contains("\"nativeState\""));
//! assert!(json.contains("\"outputLevel\""));
//! ```

pub mod level;
pub mod param;
pub mod snapshot;
pub mod unit;

pub use level::{LevelRamp, MIX_DEFAULT, MIX_MAX, MIX_MIN};
pub use param::{NativeParam, ParamEvent, ParamKind, ParamValues};
pub use snapshot::{ChainSnapshot, UnitRecord};
pub use unit::{PortLayout, Unit, UnitError, UnitId};

/// Re-exported so unit implementors use the same macro version as the trait.
pub use async_trait::async_trait;
