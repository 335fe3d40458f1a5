//! Ordered chain topology.
//!
//! [`ChainManager`] owns the units, the [`Patchbay`] that realizes their
//! serial wiring and the [`OutputBoundary`]. Every structural mutation bumps
//! a generation counter and publishes a [`ChainView`]; the parameter layer
//! compares generations to decide whether its flattened map is stale.
//!
//! [`reconnect`](ChainManager::reconnect) is the one authoritative
//! restructuring operation. [`remove`](ChainManager::remove) and
//! [`move_unit`](ChainManager::move_unit) are expressed through it.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use pedalboard_core::{MIX_DEFAULT, Unit, UnitId};
use tokio::sync::watch;

use crate::boundary::OutputBoundary;
use crate::error::ChainError;
use crate::patchbay::{Endpoint, Patchbay, TopologyError};

/// Published snapshot of the chain's structure.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainView {
    /// Structural generation this view was taken at.
    pub generation: u64,
    /// Units in chain order with their type tags.
    pub units: Vec<(UnitId, String)>,
    /// Output level at publication time.
    pub output_level: f64,
}

struct Slot {
    id: UnitId,
    unit: Arc<dyn Unit>,
}

/// Manages the ordered unit chain between the input and output boundaries.
pub struct ChainManager {
    slots: Vec<Slot>,
    patchbay: Patchbay,
    output: OutputBoundary,
    next_id: u64,
    generation: u64,
    changes: watch::Sender<ChainView>,
}

impl Default for ChainManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChainManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainManager")
            .field("units", &self.unit_types())
            .field("generation", &self.generation)
            .field("output_level", &self.output.level())
            .finish_non_exhaustive()
    }
}

impl ChainManager {
    /// Empty chain at the default output level.
    pub fn new() -> Self {
        Self::with_output_level(MIX_DEFAULT)
    }

    /// Empty chain at the given output level.
    pub fn with_output_level(level: f64) -> Self {
        let output = OutputBoundary::new(level);
        let (changes, _) = watch::channel(ChainView {
            generation: 0,
            units: Vec::new(),
            output_level: output.level(),
        });
        Self {
            slots: Vec::new(),
            patchbay: Patchbay::new(),
            output,
            next_id: 1,
            generation: 0,
            changes,
        }
    }

    /// Number of units in the chain.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the chain holds no units.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Structural generation. Bumped by every successful mutation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Unit ids in chain order.
    pub fn order(&self) -> Vec<UnitId> {
        self.slots.iter().map(|s| s.id).collect()
    }

    /// Unit type tags in chain order.
    pub fn unit_types(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.unit.type_name().to_string()).collect()
    }

    /// Units in chain order.
    pub fn units(&self) -> impl Iterator<Item = (UnitId, &Arc<dyn Unit>)> + '_ {
        self.slots.iter().map(|s| (s.id, &s.unit))
    }

    /// Look up a unit by id.
    pub fn unit(&self, id: UnitId) -> Option<&Arc<dyn Unit>> {
        self.slots.iter().find(|s| s.id == id).map(|s| &s.unit)
    }

    /// Chain position of a unit.
    pub fn position(&self, id: UnitId) -> Option<usize> {
        self.slots.iter().position(|s| s.id == id)
    }

    /// The output boundary.
    pub fn output(&self) -> &OutputBoundary {
        &self.output
    }

    /// The link set realizing the chain.
    pub fn patchbay(&self) -> &Patchbay {
        &self.patchbay
    }

    /// Walk the realized signal path from input to output.
    pub fn signal_path(&self) -> Result<Vec<Endpoint>, TopologyError> {
        self.patchbay.signal_path()
    }

    /// Total processing latency of the chain, in samples.
    pub fn latency_samples(&self) -> u32 {
        self.slots
            .iter()
            .fold(0u32, |acc, s| acc.saturating_add(s.unit.latency_samples()))
    }

    /// Current structural view.
    pub fn view(&self) -> ChainView {
        ChainView {
            generation: self.generation,
            units: self
                .slots
                .iter()
                .map(|s| (s.id, s.unit.type_name().to_string()))
                .collect(),
            output_level: self.output.level(),
        }
    }

    /// Subscribe to structural change notifications.
    pub fn subscribe(&self) -> watch::Receiver<ChainView> {
        self.changes.subscribe()
    }

    /// Set the output level immediately and publish the new view.
    pub fn set_output_level(&self, level: f64) -> f64 {
        let applied = self.output.set_level(level);
        self.changes.send_replace(self.view());
        applied
    }

    /// Apply an automated output level, ramping when `time` lies ahead of
    /// the boundary clock, and publish the new view. Returns the clamped
    /// level set or targeted.
    pub fn apply_output_level(&self, level: f64, time: Option<f64>) -> f64 {
        let applied = self.output.apply(level, time);
        self.changes.send_replace(self.view());
        applied
    }

    fn commit(&mut self) {
        self.generation += 1;
        self.changes.send_replace(self.view());
    }

    /// Append a unit at the end of the chain.
    ///
    /// The previous `last -> output` link is replaced with
    /// `last -> unit -> output`. A unit without an input or an output is
    /// rejected and nothing changes.
    pub fn insert(&mut self, unit: Arc<dyn Unit>) -> Result<UnitId, ChainError> {
        if !unit.ports().is_routable() {
            return Err(ChainError::not_routable(unit.type_name()));
        }

        let id = UnitId(self.next_id);
        self.next_id += 1;

        let last = self
            .slots
            .last()
            .map_or(Endpoint::Input, |s| Endpoint::Unit(s.id));
        self.patchbay.disconnect(last, Endpoint::Output);
        self.patchbay.connect(last, Endpoint::Unit(id));
        self.patchbay.connect(Endpoint::Unit(id), Endpoint::Output);

        tracing::info!(unit = %id, unit_type = unit.type_name(), "unit inserted");
        self.slots.push(Slot { id, unit });
        self.commit();
        Ok(id)
    }

    fn validate_order(&self, new_order: &[UnitId]) -> Result<(), ChainError> {
        let mut seen = HashSet::with_capacity(new_order.len());
        for &id in new_order {
            if self.position(id).is_none() {
                return Err(ChainError::UnknownUnit(id));
            }
            if !seen.insert(id) {
                return Err(ChainError::DuplicateUnit(id));
            }
        }
        Ok(())
    }

    /// Rewire the chain to follow `new_order`.
    ///
    /// Validation happens first: an unknown or repeated id fails the call
    /// with the topology untouched. Then every existing link is torn down,
    /// the path is rebuilt in the new order, and each unit absent from
    /// `new_order` is pruned (already disconnected, then destroyed and
    /// dropped). Returns the pruned ids in ascending order.
    pub async fn reconnect(&mut self, new_order: &[UnitId]) -> Result<Vec<UnitId>, ChainError> {
        self.validate_order(new_order)?;

        let previous: BTreeSet<UnitId> = self.slots.iter().map(|s| s.id).collect();
        let keep: BTreeSet<UnitId> = new_order.iter().copied().collect();
        let pruned: Vec<UnitId> = previous.difference(&keep).copied().collect();

        self.patchbay.rebuild(new_order);

        let mut by_id: HashMap<UnitId, Slot> = self.slots.drain(..).map(|s| (s.id, s)).collect();
        self.slots = new_order
            .iter()
            .filter_map(|id| by_id.remove(id))
            .collect();

        for slot in by_id.into_values() {
            tracing::debug!(unit = %slot.id, unit_type = slot.unit.type_name(), "destroying pruned unit");
            slot.unit.destroy().await;
        }

        tracing::info!(units = self.slots.len(), pruned = pruned.len(), "chain reconnected");
        self.commit();
        Ok(pruned)
    }

    /// Remove one unit, compacting the chain around it.
    pub async fn remove(&mut self, id: UnitId) -> Result<(), ChainError> {
        if self.position(id).is_none() {
            return Err(ChainError::UnknownUnit(id));
        }
        let order: Vec<UnitId> = self.order().into_iter().filter(|&u| u != id).collect();
        self.reconnect(&order).await.map(|_| ())
    }

    /// Move one unit to `index`. An index past the end moves it last.
    pub async fn move_unit(&mut self, id: UnitId, index: usize) -> Result<(), ChainError> {
        let from = self.position(id).ok_or(ChainError::UnknownUnit(id))?;
        let mut order = self.order();
        order.remove(from);
        order.insert(index.min(order.len()), id);
        self.reconnect(&order).await.map(|_| ())
    }
}
