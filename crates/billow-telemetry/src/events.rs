//! Sketch event types.
//!
//! Lightweight value types emitted by the frame loop. Each carries just
//! enough data to monitor pacing and solver health.

use serde::{Deserialize, Serialize};

/// An event tagged with the frame that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Frame number (0-indexed; warm-up is frame 0).
    pub frame: u64,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// Sketch finished setup and warm-up.
    SetupComplete {
        particles: u32,
        constraints: u32,
        anchors: u32,
        warmup_steps: u32,
    },

    /// Frame callback started.
    FrameBegin {
        /// Wall-clock timestamp handed to the frame (seconds).
        now: f64,
    },

    /// Fixed steps run by this frame.
    Substeps {
        /// True for the first, cold-start batch.
        cold: bool,
        steps: u32,
    },

    /// The catch-up cap cut the step count for this frame.
    CatchUpClamped {
        requested: u32,
        executed: u32,
        /// Simulated time discarded (seconds).
        dropped: f64,
    },

    /// Vertical gravity changed.
    GravityChanged { gy: f32 },

    /// Flow field regenerated for this frame.
    WindUpdated {
        /// Length of every wind vector this frame.
        magnitude: f32,
        time_offset: f64,
    },

    /// Largest constraint violation after the frame's last step.
    ConstraintError { max_error: f32 },

    /// Energy snapshot after the frame.
    Energy { kinetic: f64 },

    /// Frame callback finished.
    FrameEnd {
        /// Wall-clock time spent inside the frame (seconds).
        wall_time: f64,
    },

    /// Resources released.
    Disposed,
}

impl SimulationEvent {
    /// Creates a new event for the given frame.
    pub fn new(frame: u64, kind: EventKind) -> Self {
        Self { frame, kind }
    }
}
