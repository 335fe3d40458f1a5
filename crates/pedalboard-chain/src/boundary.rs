//! Output boundary: owns the chain's output level.

use parking_lot::Mutex;
use pedalboard_core::{LevelRamp, MIX_DEFAULT, MIX_MAX, MIX_MIN};

/// The chain's output boundary.
///
/// Internally synchronized so the level can be automated through a shared
/// reference while structural operations hold the chain exclusively.
#[derive(Debug)]
pub struct OutputBoundary {
    ramp: Mutex<LevelRamp>,
}

impl Default for OutputBoundary {
    fn default() -> Self {
        Self::new(MIX_DEFAULT)
    }
}

/// Clamp into the level range. Non-finite input falls back to the default.
pub fn clamp_level(level: f64) -> f64 {
    if level.is_finite() {
        level.clamp(MIX_MIN, MIX_MAX)
    } else {
        MIX_DEFAULT
    }
}

impl OutputBoundary {
    /// Create a boundary settled at `level`.
    pub fn new(level: f64) -> Self {
        Self {
            ramp: Mutex::new(LevelRamp::new(clamp_level(level))),
        }
    }

    /// Level at the boundary clock's current time.
    pub fn level(&self) -> f64 {
        self.ramp.lock().current()
    }

    /// Level the boundary is heading to.
    pub fn target(&self) -> f64 {
        self.ramp.lock().target()
    }

    /// Boundary clock, in host seconds.
    pub fn now(&self) -> f64 {
        self.ramp.lock().now()
    }

    /// Set the level immediately. Returns the clamped value applied.
    pub fn set_level(&self, level: f64) -> f64 {
        let level = clamp_level(level);
        self.ramp.lock().set_immediate(level);
        level
    }

    /// Ramp linearly to `level`, arriving at host time `time`.
    /// Returns the clamped target.
    pub fn ramp_to(&self, level: f64, time: f64) -> f64 {
        let level = clamp_level(level);
        self.ramp.lock().ramp_to(level, time);
        level
    }

    /// Apply an automation value: a ramp when `time` lies in the future of the
    /// boundary clock, otherwise an immediate set.
    pub fn apply(&self, level: f64, time: Option<f64>) -> f64 {
        match time {
            Some(t) if t > self.now() => self.ramp_to(level, t),
            _ => self.set_level(level),
        }
    }

    /// Move the boundary clock forward.
    pub fn advance_to(&self, time: f64) {
        self.ramp.lock().advance_to(time);
    }
}
