//! Gravity ramp.
//!
//! Interpolates the vertical gravity component linearly from `initial` to
//! `target` over a wall-clock window starting at the first update, then
//! holds `target`. Purely a function of elapsed time.

use serde::{Deserialize, Serialize};

/// Ramp settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravityRamp {
    /// Vertical gravity at the start of the window.
    pub initial: f32,
    /// Vertical gravity after the window.
    pub target: f32,
    /// Window length (milliseconds).
    pub duration_ms: f64,
    #[serde(skip)]
    start: Option<f64>,
}

impl GravityRamp {
    /// Creates a ramp that has not started yet.
    pub fn new(initial: f32, target: f32, duration_ms: f64) -> Self {
        Self {
            initial,
            target,
            duration_ms,
            start: None,
        }
    }

    /// Vertical gravity `elapsed_secs` after the ramp started.
    pub fn value_at(&self, elapsed_secs: f64) -> f32 {
        let window = self.duration_ms / 1000.0;
        if !(window > 0.0) || elapsed_secs >= window {
            return self.target;
        }
        if !(elapsed_secs > 0.0) {
            return self.initial;
        }
        let t = (elapsed_secs / window) as f32;
        self.initial + (self.target - self.initial) * t
    }

    /// Vertical gravity at wall-clock `now` (seconds). The first call
    /// starts the window.
    pub fn update(&mut self, now: f64) -> f32 {
        let start = *self.start.get_or_insert(now);
        self.value_at(now - start)
    }

    /// Whether the window has elapsed at `now`.
    pub fn is_settled(&self, now: f64) -> bool {
        match self.start {
            Some(start) => (now - start) * 1000.0 >= self.duration_ms,
            None => false,
        }
    }

    /// When the ramp started, if it has.
    pub fn started_at(&self) -> Option<f64> {
        self.start
    }
}
