//! Built-in reference units.
//!
//! Every built-in is a [`ParamTableUnit`]: a table of native parameters whose
//! opaque state is simply the current value of each parameter. They carry no
//! signal processing of their own and apply every event on arrival.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;
use parking_lot::Mutex;
use pedalboard_core::{NativeParam, ParamEvent, ParamValues, Unit, UnitError};
use serde_json::Value;

use crate::{UnitCategory, UnitDescriptor, UnitRegistry};

/// Static description of a built-in unit type.
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    /// Type name.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Category.
    pub category: UnitCategory,
    /// Search keywords.
    pub keywords: &'static [&'static str],
    /// Reported processing latency in samples.
    pub latency: u32,
    /// Parameter table constructor.
    pub params: fn() -> Vec<NativeParam>,
}

impl Builtin {
    /// Registry descriptor for this type.
    pub fn descriptor(&self) -> UnitDescriptor {
        UnitDescriptor::new(self.id, self.name, self.description, self.category)
            .with_keywords(self.keywords)
    }

    /// Fresh instance at default values.
    pub fn instantiate(&self) -> ParamTableUnit {
        ParamTableUnit::new(self.id, (self.params)()).with_latency(self.latency)
    }
}

/// All built-in unit types, in registration order.
pub const BUILTIN_TYPES: &[Builtin] = &[
    Builtin {
        id: "gain",
        name: "Gain",
        description: "Clean gain stage",
        category: UnitCategory::Utility,
        keywords: &["volume", "boost", "trim"],
        latency: 0,
        params: || vec![NativeParam::float("gain", "Gain", -24.0, 24.0, 0.0)],
    },
    Builtin {
        id: "overdrive",
        name: "Overdrive",
        description: "Soft-clipping tube-style overdrive",
        category: UnitCategory::Distortion,
        keywords: &["drive", "crunch", "saturation"],
        latency: 0,
        params: || {
            vec![
                NativeParam::float("drive", "Drive", 0.0, 1.0, 0.5),
                NativeParam::float("tone", "Tone", 0.0, 1.0, 0.5),
                NativeParam::float("level", "Level", 0.0, 1.0, 0.7),
            ]
        },
    },
    Builtin {
        id: "delay",
        name: "Delay",
        description: "Feedback delay line",
        category: UnitCategory::TimeBased,
        keywords: &["echo", "repeat"],
        latency: 0,
        params: || {
            vec![
                NativeParam::float("time", "Time", 1.0, 2000.0, 350.0),
                NativeParam::float("feedback", "Feedback", 0.0, 0.95, 0.4),
                NativeParam::float("mix", "Mix", 0.0, 1.0, 0.3),
            ]
        },
    },
    Builtin {
        id: "reverb",
        name: "Reverb",
        description: "Algorithmic room, hall and plate reverb",
        category: UnitCategory::TimeBased,
        keywords: &["space", "room", "ambience"],
        latency: 0,
        params: || {
            vec![
                NativeParam::float("size", "Room Size", 0.0, 1.0, 0.5),
                NativeParam::float("decay", "Decay", 0.1, 10.0, 2.0),
                NativeParam::float("mix", "Mix", 0.0, 1.0, 0.25),
                NativeParam::choice("mode", "Mode", &["room", "hall", "plate"], 0),
            ]
        },
    },
    Builtin {
        id: "tremolo",
        name: "Tremolo",
        description: "Amplitude modulation with selectable waveform",
        category: UnitCategory::Modulation,
        keywords: &["amplitude", "lfo", "pulse"],
        latency: 0,
        params: || {
            vec![
                NativeParam::float("rate", "Rate", 0.1, 20.0, 5.0),
                NativeParam::float("depth", "Depth", 0.0, 1.0, 0.5),
                NativeParam::choice("wave", "Wave", &["sine", "triangle", "square"], 0),
                NativeParam::boolean("sync", "Tempo Sync", false),
            ]
        },
    },
    Builtin {
        id: "limiter",
        name: "Limiter",
        description: "Lookahead brickwall limiter",
        category: UnitCategory::Dynamics,
        keywords: &["ceiling", "loudness", "compressor"],
        latency: 64,
        params: || {
            vec![
                NativeParam::float("ceiling", "Ceiling", -24.0, 0.0, -1.0),
                NativeParam::float("release", "Release", 1.0, 500.0, 50.0),
                NativeParam::int("lookahead", "Lookahead", 0, 10, 1),
            ]
        },
    },
];

pub(crate) fn register_all(registry: &mut UnitRegistry) {
    for builtin in BUILTIN_TYPES {
        let builtin = *builtin;
        registry.insert(
            builtin.descriptor(),
            Arc::new(move || {
                async move { Ok(Arc::new(builtin.instantiate()) as Arc<dyn Unit>) }.boxed()
            }),
        );
    }
}

/// A unit that is nothing but a table of parameters.
///
/// State is a JSON object mapping native parameter id to value. Applying a
/// state resets every parameter not named in it to its default.
#[derive(Debug)]
pub struct ParamTableUnit {
    type_name: String,
    params: Vec<NativeParam>,
    values: Mutex<ParamValues>,
    latency: u32,
}

impl ParamTableUnit {
    /// Create a unit with every parameter at its default.
    pub fn new(type_name: impl Into<String>, params: Vec<NativeParam>) -> Self {
        let values = Mutex::new(Self::defaults(&params));
        Self {
            type_name: type_name.into(),
            params,
            values,
            latency: 0,
        }
    }

    /// Set the reported processing latency.
    pub fn with_latency(mut self, samples: u32) -> Self {
        self.latency = samples;
        self
    }

    /// Current value of a native parameter.
    pub fn value(&self, id: &str) -> Option<f64> {
        self.values.lock().get(id).copied()
    }

    fn defaults(params: &[NativeParam]) -> ParamValues {
        params.iter().map(|p| (p.id.clone(), p.default)).collect()
    }

    fn param(&self, id: &str) -> Result<&NativeParam, UnitError> {
        self.params
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| UnitError::unknown_parameter(&self.type_name, id))
    }
}

#[async_trait]
impl Unit for ParamTableUnit {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    async fn parameter_info(&self) -> Result<Vec<NativeParam>, UnitError> {
        Ok(self.params.clone())
    }

    async fn parameter_values(&self) -> Result<ParamValues, UnitError> {
        Ok(self.values.lock().clone())
    }

    async fn schedule_event(&self, event: ParamEvent) -> Result<(), UnitError> {
        let param = self.param(&event.id)?;
        let value = if event.normalized {
            param.denormalize(event.value)
        } else {
            param.clamp(event.value)
        };
        self.values.lock().insert(event.id, value);
        Ok(())
    }

    async fn get_state(&self) -> Result<Value, UnitError> {
        Ok(serde_json::to_value(&*self.values.lock())?)
    }

    async fn set_state(&self, state: &Value) -> Result<(), UnitError> {
        let object = state
            .as_object()
            .ok_or_else(|| UnitError::invalid_state(&self.type_name, "expected a JSON object"))?;

        let mut next = Self::defaults(&self.params);
        for (id, raw) in object {
            let Some(param) = self.params.iter().find(|p| &p.id == id) else {
                continue;
            };
            let value = raw.as_f64().ok_or_else(|| {
                UnitError::invalid_state(&self.type_name, format!("'{id}' is not a number"))
            })?;
            next.insert(id.clone(), param.clamp(value));
        }
        *self.values.lock() = next;
        Ok(())
    }

    fn latency_samples(&self) -> u32 {
        self.latency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn overdrive() -> ParamTableUnit {
        BUILTIN_TYPES[1].instantiate()
    }

    #[test]
    fn builtin_ids_are_unique() {
        let mut ids: Vec<_> = BUILTIN_TYPES.iter().map(|b| b.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), BUILTIN_TYPES.len());
    }

    #[tokio::test]
    async fn events_clamp_and_denormalize() {
        let unit = overdrive();
        unit.schedule_event(ParamEvent::new("drive", 3.0)).await.unwrap();
        assert_eq!(unit.value("drive"), Some(1.0));

        let delay = BUILTIN_TYPES[2].instantiate();
        delay
            .schedule_event(ParamEvent::new("feedback", 0.5).normalized(true))
            .await
            .unwrap();
        assert!((delay.value("feedback").unwrap() - 0.475).abs() < 1e-12);
    }

    #[tokio::test]
    async fn unknown_parameter_is_an_error() {
        let unit = overdrive();
        let err = unit.schedule_event(ParamEvent::new("fuzz", 1.0)).await.unwrap_err();
        assert!(matches!(err, UnitError::UnknownParameter { .. }));
    }

    #[tokio::test]
    async fn state_round_trip() {
        let a = overdrive();
        a.schedule_event(ParamEvent::new("tone", 0.9)).await.unwrap();
        let state = a.get_state().await.unwrap();
        assert_eq!(state["tone"], json!(0.9));

        let b = overdrive();
        b.set_state(&state).await.unwrap();
        assert_eq!(b.parameter_values().await.unwrap(), a.parameter_values().await.unwrap());
    }

    #[tokio::test]
    async fn set_state_resets_missing_and_ignores_unknown_keys() {
        let unit = overdrive();
        unit.schedule_event(ParamEvent::new("drive", 0.1)).await.unwrap();
        unit.set_state(&json!({ "level": 0.2, "bogus": 4 })).await.unwrap();
        assert_eq!(unit.value("drive"), Some(0.5));
        assert_eq!(unit.value("level"), Some(0.2));
        assert_eq!(unit.value("bogus"), None);
    }

    #[tokio::test]
    async fn set_state_rejects_malformed_blobs() {
        let unit = overdrive();
        assert!(unit.set_state(&json!([1, 2])).await.is_err());
        assert!(unit.set_state(&json!({ "drive": "loud" })).await.is_err());
        assert_eq!(unit.value("drive"), Some(0.5));
    }

    #[test]
    fn limiter_reports_latency() {
        let limiter = BUILTIN_TYPES
            .iter()
            .find(|b| b.id == "limiter")
            .unwrap()
            .instantiate();
        assert_eq!(limiter.latency_samples(), 64);
    }
}
