//! Pluggable event sinks.

use std::sync::{Arc, Mutex};

use crate::events::{EventKind, SimulationEvent};

/// Trait for event consumers.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &SimulationEvent);

    /// Called when the sketch shuts down.
    fn finalize(&mut self) {}

    /// Returns a human-readable name for this sink.
    fn name(&self) -> &str;
}

/// Collects events in memory for tests and inspection.
///
/// The buffer is shared, so a clone kept outside the bus sees everything
/// the boxed sink receives.
#[derive(Clone, Default)]
pub struct VecSink {
    events: Arc<Mutex<Vec<SimulationEvent>>>,
}

impl VecSink {
    /// Creates an empty vec sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the collected events.
    pub fn events(&self) -> Vec<SimulationEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of collected events.
    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &SimulationEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// Logs events through `tracing`.
///
/// Dropped catch-up time is a warning; per-frame chatter is debug.
#[derive(Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &SimulationEvent) {
        match &event.kind {
            EventKind::CatchUpClamped {
                requested,
                executed,
                dropped,
            } => tracing::warn!(
                frame = event.frame,
                requested,
                executed,
                dropped,
                "catch-up capped, simulated time dropped"
            ),
            EventKind::SetupComplete { .. } | EventKind::Disposed => tracing::info!(
                frame = event.frame,
                event = ?event.kind,
                "sketch_event"
            ),
            kind => tracing::debug!(frame = event.frame, event = ?kind, "sketch_event"),
        }
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}
