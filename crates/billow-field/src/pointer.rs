//! Pointer context.
//!
//! The input handler writes the most recent pointer position; the flow
//! field reads it once per frame. The two components are stored as
//! independent atomics, so a reader may observe `x` from one event and
//! `y` from the next. That only nudges the wind strength for one frame.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

/// A pointer position in normalized device coordinates (`[-1, 1]` on
/// both axes, `+y` up).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
}

impl PointerSample {
    /// Creates a sample from NDC coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Converts a window-space pointer position (pixels, origin top-left)
    /// to NDC. A zero-sized window maps to the centre.
    pub fn from_window(client_x: f32, client_y: f32, width: f32, height: f32) -> Self {
        if width <= 0.0 || height <= 0.0 {
            return Self::default();
        }
        Self {
            x: (client_x / width) * 2.0 - 1.0,
            y: -(client_y / height) * 2.0 + 1.0,
        }
    }

    /// Distance from the centre of the screen.
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// Latest-wins pointer position shared between the input handler and
/// the simulation. Wrap in an `Arc` to share.
#[derive(Debug, Default)]
pub struct PointerState {
    x: AtomicU32,
    y: AtomicU32,
}

impl PointerState {
    /// Creates a state with the pointer at the centre.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new pointer position. Non-finite components are ignored.
    pub fn set(&self, sample: PointerSample) {
        if sample.x.is_finite() {
            self.x.store(sample.x.to_bits(), Ordering::Relaxed);
        }
        if sample.y.is_finite() {
            self.y.store(sample.y.to_bits(), Ordering::Relaxed);
        }
    }

    /// Read the latest pointer position.
    pub fn sample(&self) -> PointerSample {
        PointerSample {
            x: f32::from_bits(self.x.load(Ordering::Relaxed)),
            y: f32::from_bits(self.y.load(Ordering::Relaxed)),
        }
    }
}
