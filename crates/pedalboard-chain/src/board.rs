//! The [`Pedalboard`] facade.
//!
//! Serializes access to the chain for concurrent callers: structural
//! operations hold the chain's write lock for their whole duration, so only
//! one is ever in flight, while parameter queries and automation share the
//! read lock and run concurrently with each other. A read that starts after
//! a structural operation returns sees only the post-mutation namespace.

use std::sync::Arc;

use pedalboard_core::{ChainSnapshot, MIX_DEFAULT, ParamValues, Unit, UnitId};
use pedalboard_registry::UnitRegistry;
use tokio::sync::{RwLock, broadcast, watch};

use crate::error::ChainError;
use crate::manager::{ChainManager, ChainView};
use crate::params::{AutomationEvent, Dispatch, FlatParam, ParamSpace};
use crate::patchbay::{Endpoint, TopologyError};
use crate::state::{self, RestoreReport};

/// A live chain host: topology, flattened parameters and state, behind one
/// handle.
#[derive(Debug)]
pub struct Pedalboard {
    chain: RwLock<ChainManager>,
    params: ParamSpace,
    registry: Arc<UnitRegistry>,
}

impl Pedalboard {
    /// Empty pedalboard at the default output level.
    pub fn new(registry: Arc<UnitRegistry>) -> Self {
        Self::with_output_level(registry, MIX_DEFAULT)
    }

    /// Empty pedalboard at the given output level.
    pub fn with_output_level(registry: Arc<UnitRegistry>, level: f64) -> Self {
        Self {
            chain: RwLock::new(ChainManager::with_output_level(level)),
            params: ParamSpace::new(),
            registry,
        }
    }

    /// The injected unit registry.
    pub fn registry(&self) -> &Arc<UnitRegistry> {
        &self.registry
    }

    // Structure

    /// Create a unit of `unit_type` through the registry and append it.
    pub async fn add_unit(&self, unit_type: &str) -> Result<UnitId, ChainError> {
        let unit = self.registry.create(unit_type).await?;
        self.insert(unit).await
    }

    /// Append an already constructed unit.
    ///
    /// A rejected unit is destroyed before the error is returned.
    pub async fn insert(&self, unit: Arc<dyn Unit>) -> Result<UnitId, ChainError> {
        let result = self.chain.write().await.insert(Arc::clone(&unit));
        if result.is_err() {
            unit.destroy().await;
        }
        result
    }

    /// Rewire the chain to `order`, pruning every unit not listed.
    pub async fn reconnect(&self, order: &[UnitId]) -> Result<Vec<UnitId>, ChainError> {
        self.chain.write().await.reconnect(order).await
    }

    /// Remove one unit.
    pub async fn remove(&self, id: UnitId) -> Result<(), ChainError> {
        self.chain.write().await.remove(id).await
    }

    /// Move one unit to `index`.
    pub async fn move_unit(&self, id: UnitId, index: usize) -> Result<(), ChainError> {
        self.chain.write().await.move_unit(id, index).await
    }

    /// Unit ids in chain order.
    pub async fn order(&self) -> Vec<UnitId> {
        self.chain.read().await.order()
    }

    /// Current structural view.
    pub async fn view(&self) -> ChainView {
        self.chain.read().await.view()
    }

    /// Walk the realized signal path.
    pub async fn signal_path(&self) -> Result<Vec<Endpoint>, TopologyError> {
        self.chain.read().await.signal_path()
    }

    /// Total chain latency in samples.
    pub async fn latency_samples(&self) -> u32 {
        self.chain.read().await.latency_samples()
    }

    /// Subscribe to structural change notifications.
    pub async fn subscribe_changes(&self) -> watch::Receiver<ChainView> {
        self.chain.read().await.subscribe()
    }

    // Parameters

    /// Flattened descriptors; see [`ParamSpace::parameter_info`].
    pub async fn parameter_info(&self, ids: Option<&[String]>) -> Vec<FlatParam> {
        let chain = self.chain.read().await;
        self.params.parameter_info(&chain, ids).await
    }

    /// Value of one flat parameter; empty for stale or unknown ids.
    pub async fn parameter_values(&self, flat_id: &str) -> Result<ParamValues, ChainError> {
        let chain = self.chain.read().await;
        self.params.parameter_values(&chain, flat_id).await
    }

    /// Route one automation event.
    pub async fn schedule_event(&self, event: AutomationEvent) -> Result<Dispatch, ChainError> {
        let chain = self.chain.read().await;
        self.params.schedule_event(&chain, event).await
    }

    /// Drop pending events in every unit.
    pub async fn clear_events(&self) {
        let chain = self.chain.read().await;
        self.params.clear_events(&chain).await;
    }

    /// Subscribe to re-emitted automation events.
    pub fn subscribe_automation(&self) -> broadcast::Receiver<AutomationEvent> {
        self.params.subscribe()
    }

    // Output level

    /// Output level at the boundary clock's current time.
    pub async fn output_level(&self) -> f64 {
        self.chain.read().await.output().level()
    }

    /// Set the output level immediately. Returns the clamped value.
    pub async fn set_output_level(&self, level: f64) -> f64 {
        self.chain.read().await.set_output_level(level)
    }

    /// Move the output boundary clock forward.
    pub async fn advance_to(&self, time: f64) {
        self.chain.read().await.output().advance_to(time);
    }

    // State

    /// Capture the chain composition.
    pub async fn get_state(&self) -> Result<ChainSnapshot, ChainError> {
        state::capture(&*self.chain.read().await).await
    }

    /// Replace the chain composition with `snapshot`.
    pub async fn set_state(&self, snapshot: &ChainSnapshot) -> Result<RestoreReport, ChainError> {
        let mut chain = self.chain.write().await;
        state::restore(&mut chain, &self.registry, snapshot).await
    }
}
