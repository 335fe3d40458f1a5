//! Time-based linear ramp for the output level.
//!
//! [`LevelRamp`] tracks a value against a host clock in seconds rather than a
//! sample counter: automation arrives with absolute host times, and the
//! output boundary must reach the requested level exactly at that time.
//! Advancing the clock is the audio engine's job; the ramp only interpolates.
//!
//! ```rust
//! use pedalboard_core::LevelRamp;
//!
//! let mut level = LevelRamp::new(1.0);
//! level.ramp_to(0.0, 2.0);
//! level.advance_to(1.0);
//! assert_eq!(level.current(), 0.5);
//! level.advance_to(3.0);
//! assert_eq!(level.current(), 0.0);
//! ```

/// Lowest output level.
pub const MIX_MIN: f64 = 0.0;
/// Highest output level (unity gain).
pub const MIX_MAX: f64 = 1.0;
/// Output level of a fresh chain.
pub const MIX_DEFAULT: f64 = 1.0;

/// Linear ramp between two points on the host timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelRamp {
    /// Value at `start_time`.
    start_value: f64,
    /// Host time the ramp started.
    start_time: f64,
    /// Value reached at `end_time` and held afterwards.
    target: f64,
    /// Host time the target is reached.
    end_time: f64,
    /// Current host time.
    now: f64,
}

impl LevelRamp {
    /// Create a settled ramp at `initial`, clock at zero.
    pub fn new(initial: f64) -> Self {
        Self {
            start_value: initial,
            start_time: 0.0,
            target: initial,
            end_time: 0.0,
            now: 0.0,
        }
    }

    /// Value at an arbitrary host time.
    pub fn value_at(&self, time: f64) -> f64 {
        if time >= self.end_time {
            return self.target;
        }
        if time <= self.start_time {
            return self.start_value;
        }
        let span = self.end_time - self.start_time;
        let t = (time - self.start_time) / span;
        self.start_value + (self.target - self.start_value) * t
    }

    /// Value at the current host time.
    pub fn current(&self) -> f64 {
        self.value_at(self.now)
    }

    /// Final value of the ramp in progress (or the settled value).
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Current host time.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Returns `true` while a ramp is still moving.
    pub fn is_ramping(&self) -> bool {
        self.now < self.end_time && (self.target - self.current()).abs() > f64::EPSILON
    }

    /// Jump to `value` at the current time, cancelling any ramp.
    pub fn set_immediate(&mut self, value: f64) {
        self.start_value = value;
        self.target = value;
        self.start_time = self.now;
        self.end_time = self.now;
    }

    /// Ramp linearly from the current value to `target`, arriving at `end_time`.
    ///
    /// An `end_time` at or before the current time applies immediately.
    pub fn ramp_to(&mut self, target: f64, end_time: f64) {
        if end_time <= self.now {
            self.set_immediate(target);
            return;
        }
        self.start_value = self.current();
        self.start_time = self.now;
        self.target = target;
        self.end_time = end_time;
    }

    /// Move the clock forward. Time never runs backwards.
    pub fn advance_to(&mut self, time: f64) {
        if time > self.now {
            self.now = time;
        }
    }
}

impl Default for LevelRamp {
    fn default() -> Self {
        Self::new(MIX_DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_set() {
        let mut r = LevelRamp::new(0.2);
        r.set_immediate(0.9);
        assert_eq!(r.current(), 0.9);
        assert!(!r.is_ramping());
    }

    #[test]
    fn ramp_interpolates_linearly() {
        let mut r = LevelRamp::new(0.0);
        r.advance_to(1.0);
        r.ramp_to(1.0, 5.0);
        assert!(r.is_ramping());
        assert_eq!(r.current(), 0.0);
        r.advance_to(2.0);
        assert!((r.current() - 0.25).abs() < 1e-12);
        r.advance_to(5.0);
        assert_eq!(r.current(), 1.0);
        assert!(!r.is_ramping());
    }

    #[test]
    fn past_end_time_applies_immediately() {
        let mut r = LevelRamp::new(1.0);
        r.advance_to(10.0);
        r.ramp_to(0.3, 4.0);
        assert_eq!(r.current(), 0.3);
    }

    #[test]
    fn retarget_mid_ramp_starts_from_current_value() {
        let mut r = LevelRamp::new(0.0);
        r.ramp_to(1.0, 4.0);
        r.advance_to(2.0);
        r.ramp_to(0.0, 4.0);
        assert!((r.current() - 0.5).abs() < 1e-12);
        r.advance_to(3.0);
        assert!((r.current() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn clock_is_monotonic() {
        let mut r = LevelRamp::default();
        r.advance_to(3.0);
        r.advance_to(1.0);
        assert_eq!(r.now(), 3.0);
        assert_eq!(r.target(), MIX_DEFAULT);
    }
}
