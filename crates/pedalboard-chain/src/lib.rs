//! Chain orchestration for the pedalboard host.
//!
//! A [`Pedalboard`] hosts an ordered chain of opaque [`Unit`]s between an
//! input and an output boundary. It keeps the chain's wiring in step with
//! the requested order, flattens every unit's parameters into one host
//! namespace, and captures or restores the whole composition as a
//! [`ChainSnapshot`]. A [`Session`] binds a pedalboard to a preset library.
//!
//! # Modules
//!
//! - [`manager`] - Ordered units, generation counter and change feed
//! - [`patchbay`] - Directed links realizing the serial chain
//! - [`boundary`] - Output level with time-based ramps
//! - [`params`] - Flattened parameter namespace and automation routing
//! - [`state`] - Snapshot capture and restore
//! - [`board`] - The concurrent [`Pedalboard`] facade
//! - [`session`] - Save/load against a [`PresetLibrary`](pedalboard_config::PresetLibrary)
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use pedalboard_chain::{AutomationEvent, Dispatch, MIX_FLAT_ID, Pedalboard};
//! use pedalboard_registry::UnitRegistry;
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let board = Pedalboard::new(Arc::new(UnitRegistry::new()));
//! let drive = board.add_unit("overdrive").await.unwrap();
//! let verb = board.add_unit("reverb").await.unwrap();
//!
//! // Swap the two units
//! board.reconnect(&[verb, drive]).await.unwrap();
//! assert_eq!(board.get_state().await.unwrap().unit_types(), vec!["reverb", "overdrive"]);
//!
//! // The output level is automated like any other parameter
//! let params = board.parameter_info(None).await;
//! assert_eq!(params.last().unwrap().flat_id, MIX_FLAT_ID);
//! let dispatch = board.schedule_event(AutomationEvent::new(MIX_FLAT_ID, 0.5)).await.unwrap();
//! assert!(matches!(dispatch, Dispatch::ToMix { .. }));
//! # });
//! ```
//!
//! [`Unit`]: pedalboard_core::Unit
//! [`ChainSnapshot`]: pedalboard_core::ChainSnapshot

pub mod board;
pub mod boundary;
pub mod error;
pub mod manager;
pub mod params;
pub mod patchbay;
pub mod session;
pub mod state;

pub use board::Pedalboard;
pub use boundary::{OutputBoundary, clamp_level};
pub use error::ChainError;
pub use manager::{ChainManager, ChainView};
pub use params::{AutomationEvent, Dispatch, FlatParam, MIX_FLAT_ID, ParamSpace};
pub use patchbay::{Endpoint, Link, Patchbay, TopologyError};
pub use session::Session;
pub use state::{RestoreFailure, RestoreReport, capture, restore};
