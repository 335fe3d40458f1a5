//! Chain error types.

use pedalboard_config::StoreError;
use pedalboard_core::{UnitError, UnitId};
use pedalboard_registry::RegistryError;
use thiserror::Error;

/// Errors from chain operations.
///
/// Structural variants are returned before anything is mutated: when an
/// operation fails with [`UnknownUnit`](Self::UnknownUnit),
/// [`DuplicateUnit`](Self::DuplicateUnit) or [`NotRoutable`](Self::NotRoutable)
/// the topology is exactly what it was before the call.
#[derive(Debug, Error)]
pub enum ChainError {
    /// An id does not name a unit currently in the chain.
    #[error("unknown unit id {0}")]
    UnknownUnit(UnitId),

    /// The same id appears more than once in a requested order.
    #[error("unit id {0} listed more than once")]
    DuplicateUnit(UnitId),

    /// The unit lacks an input or an output and cannot sit in a serial chain.
    #[error("unit '{unit_type}' cannot be chained: it needs an input and an output")]
    NotRoutable {
        /// Type tag of the rejected unit.
        unit_type: String,
    },

    /// A unit failed across its execution boundary.
    #[error(transparent)]
    Unit(#[from] UnitError),

    /// The registry could not produce a unit.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Preset store or persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ChainError {
    /// Create a not-routable error.
    pub fn not_routable(unit_type: impl Into<String>) -> Self {
        ChainError::NotRoutable {
            unit_type: unit_type.into(),
        }
    }

    /// Returns `true` for errors that leave the topology untouched by contract.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ChainError::UnknownUnit(_) | ChainError::DuplicateUnit(_) | ChainError::NotRoutable { .. }
        )
    }
}
