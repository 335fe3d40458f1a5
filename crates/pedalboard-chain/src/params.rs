//! Flattened host parameter namespace.
//!
//! [`ParamSpace`] presents every native parameter of every unit in the chain,
//! plus one synthetic output-level parameter, as a single flat list keyed by
//! string ids. Hosts automate by flat id; the space translates each event to
//! the owning unit's native id before forwarding it.
//!
//! # Flat ids
//!
//! A unit parameter's flat id is `#{position} {type}[{unit id}] {label}`,
//! with a 1-based chain position. The output level is always [`MIX_FLAT_ID`].
//! Two units of the same type never collide because the unit id is part of
//! the key; two parameters of one unit sharing a label get their native id
//! appended in parentheses, followed by a counter if even that is taken.
//!
//! # Staleness
//!
//! The map is built for one chain generation. Once the chain mutates, every
//! unit flat id from the old map is stale: value queries return an empty map
//! and events report [`Dispatch::Stale`] until the host calls
//! [`parameter_info`](ParamSpace::parameter_info) again. The Mix id is bound
//! to the output boundary rather than to a unit and never goes stale.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures_util::future::join_all;
use parking_lot::Mutex;
use pedalboard_core::{
    MIX_DEFAULT, MIX_MAX, MIX_MIN, NativeParam, ParamEvent, ParamKind, ParamValues, Unit, UnitId,
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::ChainError;
use crate::manager::ChainManager;

/// Flat id of the synthetic output-level parameter.
pub const MIX_FLAT_ID: &str = "Mix";

/// Capacity of the automation re-emission channel.
const AUTOMATION_CAPACITY: usize = 256;

/// One entry of the flattened namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatParam {
    /// Host-facing id, valid for one chain generation.
    pub flat_id: String,
    /// Owning unit; `None` for the Mix parameter.
    pub owner: Option<UnitId>,
    /// Native parameter id inside the owner; `None` for Mix.
    pub local_id: Option<String>,
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
}

impl FlatParam {
    fn mix() -> Self {
        Self {
            flat_id: MIX_FLAT_ID.to_string(),
            owner: None,
            local_id: None,
            label: MIX_FLAT_ID.to_string(),
            kind: ParamKind::Float,
            min: MIX_MIN,
            max: MIX_MAX,
            default: MIX_DEFAULT,
        }
    }

    /// Returns `true` for the synthetic output-level entry.
    pub fn is_mix(&self) -> bool {
        self.owner.is_none()
    }
}

/// An automation event addressed by flat id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationEvent {
    /// Flat parameter id.
    pub flat_id: String,
    /// New value, plain or normalized.
    pub value: f64,
    /// Host time in seconds; `None` means now.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    /// `value` is normalized to \[0.0, 1.0\].
    #[serde(default)]
    pub normalized: bool,
}

impl AutomationEvent {
    /// Immediate plain-value event.
    pub fn new(flat_id: impl Into<String>, value: f64) -> Self {
        Self {
            flat_id: flat_id.into(),
            value,
            time: None,
            normalized: false,
        }
    }

    /// Schedule at host time `time`.
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

/// Where a scheduled event ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Translated and forwarded to a unit.
    ToUnit {
        /// Receiving unit.
        unit: UnitId,
        /// The event as the unit received it.
        event: ParamEvent,
    },
    /// Applied to the output boundary.
    ToMix {
        /// Clamped level the boundary is set or ramping to.
        level: f64,
    },
    /// The flat id is unknown or from an older generation; nothing happened.
    Stale,
}

#[derive(Debug, Clone)]
struct Entry {
    owner: UnitId,
    native: NativeParam,
}

#[derive(Debug, Default)]
struct FlatMap {
    generation: u64,
    params: Vec<FlatParam>,
    entries: HashMap<String, Entry>,
}

#[derive(Debug, Default)]
struct Inner {
    map: Option<FlatMap>,
    /// Descriptors resolved by value queries, for the map's generation.
    resolved: HashMap<String, Entry>,
}

impl Inner {
    fn current(&self, generation: u64) -> Option<&FlatMap> {
        self.map.as_ref().filter(|m| m.generation == generation)
    }
}

/// The chain's flattened, host-automatable parameter space.
#[derive(Debug)]
pub struct ParamSpace {
    inner: Mutex<Inner>,
    automation: broadcast::Sender<AutomationEvent>,
}

impl Default for ParamSpace {
    fn default() -> Self {
        Self::new()
    }
}

fn flat_id(position: usize, unit_type: &str, unit: UnitId, label: &str) -> String {
    format!("#{position} {unit_type}[{unit}] {label}")
}

impl ParamSpace {
    /// Empty space; the first query builds the map.
    pub fn new() -> Self {
        let (automation, _) = broadcast::channel(AUTOMATION_CAPACITY);
        Self {
            inner: Mutex::new(Inner::default()),
            automation,
        }
    }

    /// Subscribe to re-emitted automation events.
    pub fn subscribe(&self) -> broadcast::Receiver<AutomationEvent> {
        self.automation.subscribe()
    }

    /// Returns `true` if the map was not built for the chain's generation.
    pub fn is_stale(&self, chain: &ChainManager) -> bool {
        self.inner.lock().current(chain.generation()).is_none()
    }

    async fn rebuild(&self, chain: &ChainManager) -> Vec<FlatParam> {
        let generation = chain.generation();
        let units: Vec<(UnitId, Arc<dyn Unit>)> =
            chain.units().map(|(id, u)| (id, Arc::clone(u))).collect();

        let infos = join_all(units.iter().map(|(_, u)| u.parameter_info())).await;

        let mut map = FlatMap {
            generation,
            ..FlatMap::default()
        };
        for (position, ((id, unit), info)) in units.iter().zip(infos).enumerate() {
            let natives = match info {
                Ok(natives) => natives,
                Err(e) => {
                    tracing::warn!(unit = %id, error = %e, "parameter query failed, unit omitted");
                    continue;
                }
            };
            let mut labels = HashSet::new();
            for native in natives {
                let base = flat_id(position + 1, unit.type_name(), *id, &native.label);
                let mut key = base.clone();
                if !labels.insert(native.label.clone()) || map.entries.contains_key(&key) {
                    key = format!("{base} ({})", native.id);
                    let mut n = 2;
                    while map.entries.contains_key(&key) {
                        key = format!("{base} ({}) {n}", native.id);
                        n += 1;
                    }
                }
                map.params.push(FlatParam {
                    flat_id: key.clone(),
                    owner: Some(*id),
                    local_id: Some(native.id.clone()),
                    label: native.label.clone(),
                    kind: native.kind,
                    min: native.min,
                    max: native.max,
                    default: native.default,
                });
                map.entries.insert(key, Entry { owner: *id, native });
            }
        }
        map.params.push(FlatParam::mix());

        tracing::debug!(generation, params = map.params.len(), "parameter map rebuilt");
        let params = map.params.clone();
        let mut inner = self.inner.lock();
        inner.map = Some(map);
        inner.resolved.clear();
        params
    }

    /// Flattened descriptors.
    ///
    /// `None` rebuilds the whole map and returns all of it. `Some(ids)`
    /// returns the matching subset in map order, rebuilding first only if
    /// the map is stale; unknown ids are simply absent.
    pub async fn parameter_info(
        &self,
        chain: &ChainManager,
        ids: Option<&[String]>,
    ) -> Vec<FlatParam> {
        let Some(ids) = ids else {
            return self.rebuild(chain).await;
        };
        let cached = self
            .inner
            .lock()
            .current(chain.generation())
            .map(|m| m.params.clone());
        let params = match cached {
            Some(params) => params,
            None => self.rebuild(chain).await,
        };
        params
            .into_iter()
            .filter(|p| ids.iter().any(|id| id == &p.flat_id))
            .collect()
    }

    fn resolve(&self, chain: &ChainManager, flat_id: &str) -> Option<Entry> {
        let inner = self.inner.lock();
        let map = inner.current(chain.generation())?;
        inner
            .resolved
            .get(flat_id)
            .or_else(|| map.entries.get(flat_id))
            .cloned()
    }

    /// Current value of one flat parameter, keyed by its flat id.
    ///
    /// Stale or unknown ids yield an empty map.
    pub async fn parameter_values(
        &self,
        chain: &ChainManager,
        flat_id: &str,
    ) -> Result<ParamValues, ChainError> {
        if flat_id == MIX_FLAT_ID {
            return Ok(ParamValues::from([(MIX_FLAT_ID.to_string(), chain.output().level())]));
        }
        let Some(entry) = self.resolve(chain, flat_id) else {
            tracing::warn!(flat_id, "value query for stale or unknown parameter");
            return Ok(ParamValues::new());
        };
        let Some(unit) = chain.unit(entry.owner) else {
            return Ok(ParamValues::new());
        };

        let values = unit.parameter_values().await?;
        let mut out = ParamValues::new();
        if let Some(&value) = values.get(&entry.native.id) {
            out.insert(flat_id.to_string(), value);
        }

        let mut inner = self.inner.lock();
        if inner.current(chain.generation()).is_some() {
            inner.resolved.insert(flat_id.to_string(), entry);
        }
        Ok(out)
    }

    /// Translate and forward one automation event.
    ///
    /// Mix events set or ramp the output level and reach no unit. Unit
    /// events are denormalized when the host sent a normalized value for a
    /// parameter that is not natively normalized, re-addressed to the native
    /// id and forwarded. Every applied event is re-emitted to automation
    /// subscribers.
    pub async fn schedule_event(
        &self,
        chain: &ChainManager,
        event: AutomationEvent,
    ) -> Result<Dispatch, ChainError> {
        if event.flat_id == MIX_FLAT_ID {
            let value = if event.normalized {
                MIX_MIN + event.value.clamp(0.0, 1.0) * (MIX_MAX - MIX_MIN)
            } else {
                event.value
            };
            let level = chain.apply_output_level(value, event.time);
            let _ = self.automation.send(event);
            return Ok(Dispatch::ToMix { level });
        }

        let Some(entry) = self.resolve(chain, &event.flat_id) else {
            tracing::warn!(flat_id = %event.flat_id, "event for stale or unknown parameter dropped");
            return Ok(Dispatch::Stale);
        };
        let Some(unit) = chain.unit(entry.owner) else {
            return Ok(Dispatch::Stale);
        };

        let (value, normalized) = if event.normalized && !entry.native.normalized {
            (entry.native.denormalize(event.value), false)
        } else {
            (event.value, event.normalized)
        };
        let native = ParamEvent {
            id: entry.native.id.clone(),
            value,
            time: event.time,
            normalized,
        };
        unit.schedule_event(native.clone()).await?;
        let _ = self.automation.send(event);
        Ok(Dispatch::ToUnit {
            unit: entry.owner,
            event: native,
        })
    }

    /// Drop pending events in every unit, in chain order.
    pub async fn clear_events(&self, chain: &ChainManager) {
        join_all(chain.units().map(|(_, u)| u.clear_events())).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_id_format() {
        assert_eq!(flat_id(2, "delay", UnitId(7), "Time"), "#2 delay[7] Time");
    }

    #[test]
    fn mix_descriptor() {
        let mix = FlatParam::mix();
        assert!(mix.is_mix());
        assert_eq!(mix.flat_id, MIX_FLAT_ID);
        assert_eq!((mix.min, mix.max, mix.default), (0.0, 1.0, 1.0));
    }

    #[test]
    fn automation_event_json() {
        let ev = AutomationEvent::new("Mix", 0.5).at(2.0).normalized(true);
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["flatId"], "Mix");
        assert_eq!(json["time"], 2.0);
        assert_eq!(json["normalized"], true);
    }

    #[tokio::test]
    async fn empty_chain_has_only_mix() {
        let chain = ChainManager::new();
        let space = ParamSpace::new();
        assert!(space.is_stale(&chain));
        let params = space.parameter_info(&chain, None).await;
        assert_eq!(params, vec![FlatParam::mix()]);
        assert!(!space.is_stale(&chain));
    }

    #[tokio::test]
    async fn mix_values_and_events() {
        let chain = ChainManager::new();
        let space = ParamSpace::new();
        let mut rx = space.subscribe();

        let dispatch = space
            .schedule_event(&chain, AutomationEvent::new(MIX_FLAT_ID, 0.25))
            .await
            .unwrap();
        assert_eq!(dispatch, Dispatch::ToMix { level: 0.25 });
        assert_eq!(
            space.parameter_values(&chain, MIX_FLAT_ID).await.unwrap(),
            ParamValues::from([(MIX_FLAT_ID.to_string(), 0.25)])
        );
        assert_eq!(rx.try_recv().unwrap().value, 0.25);
    }

    #[tokio::test]
    async fn unknown_ids_are_stale() {
        let chain = ChainManager::new();
        let space = ParamSpace::new();
        space.parameter_info(&chain, None).await;
        assert!(space.parameter_values(&chain, "#1 gain[1] Gain").await.unwrap().is_empty());
        let dispatch = space
            .schedule_event(&chain, AutomationEvent::new("#1 gain[1] Gain", 0.5))
            .await
            .unwrap();
        assert_eq!(dispatch, Dispatch::Stale);
    }
}
