//! Chain state capture and restore.
//!
//! [`capture`] turns the live chain into a [`ChainSnapshot`]; [`restore`]
//! replaces the live chain with the composition a snapshot describes. Restore
//! is a full replace, never a merge, and recovers from per-unit failures:
//! an entry that cannot be recreated is skipped and reported in the
//! [`RestoreReport`].

use futures_util::future::join_all;
use pedalboard_core::{ChainSnapshot, UnitId, UnitRecord};
use pedalboard_registry::UnitRegistry;

use crate::error::ChainError;
use crate::manager::ChainManager;

/// One snapshot entry that could not be restored.
#[derive(Debug)]
pub struct RestoreFailure {
    /// Position of the entry in the snapshot.
    pub index: usize,
    /// Recorded unit type.
    pub unit_type: String,
    /// What went wrong.
    pub error: ChainError,
}

/// Outcome of a restore.
#[derive(Debug, Default)]
pub struct RestoreReport {
    /// Ids of the recreated units, in chain order.
    pub restored: Vec<UnitId>,
    /// Entries that were skipped.
    pub failures: Vec<RestoreFailure>,
}

impl RestoreReport {
    /// Returns `true` if every entry was restored.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Capture the chain: unit types and opaque states in chain order, plus the
/// output level.
///
/// States are queried concurrently; the snapshot keeps chain order.
pub async fn capture(chain: &ChainManager) -> Result<ChainSnapshot, ChainError> {
    let states = join_all(chain.units().map(|(_, u)| async move {
        u.get_state()
            .await
            .map(|state| UnitRecord::new(u.type_name(), state))
    }))
    .await;

    let mut snapshot = ChainSnapshot::new(chain.output().level());
    for record in states {
        snapshot.units.push(record?);
    }
    Ok(snapshot)
}

/// Replace the chain with the composition in `snapshot`.
///
/// Every current unit is pruned first. Each entry is then created through
/// the registry, given its recorded state and appended. Finally the output
/// level is applied, clamped to its range.
pub async fn restore(
    chain: &mut ChainManager,
    registry: &UnitRegistry,
    snapshot: &ChainSnapshot,
) -> Result<RestoreReport, ChainError> {
    chain.reconnect(&[]).await?;

    let mut report = RestoreReport::default();
    for (index, record) in snapshot.units.iter().enumerate() {
        match restore_one(chain, registry, record).await {
            Ok(id) => report.restored.push(id),
            Err(error) => {
                tracing::warn!(index, unit_type = %record.unit_type, %error, "skipping unit on restore");
                report.failures.push(RestoreFailure {
                    index,
                    unit_type: record.unit_type.clone(),
                    error,
                });
            }
        }
    }

    chain.set_output_level(snapshot.output_level);
    tracing::info!(
        units = report.restored.len(),
        failed = report.failures.len(),
        "chain restored"
    );
    Ok(report)
}

async fn restore_one(
    chain: &mut ChainManager,
    registry: &UnitRegistry,
    record: &UnitRecord,
) -> Result<UnitId, ChainError> {
    let unit = registry.create(&record.unit_type).await?;
    if let Err(e) = unit.set_state(&record.native_state).await {
        unit.destroy().await;
        return Err(e.into());
    }
    match chain.insert(unit.clone()) {
        Ok(id) => Ok(id),
        Err(e) => {
            unit.destroy().await;
            Err(e)
        }
    }
}
