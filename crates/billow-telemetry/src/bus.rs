//! Event bus with pluggable sinks.
//!
//! The bus tracks the frame currently running and stamps every emitted
//! [`EventKind`] with it, so producers never thread frame numbers through.
//! Events queue on a `std::sync::mpsc` channel, so `emit` needs only
//! `&self`. Sinks see them when the owner calls [`EventBus::flush`].

use std::sync::mpsc;

use crate::events::{EventKind, SimulationEvent};
use crate::sinks::EventSink;

/// Broadcast event bus for sketch telemetry.
pub struct EventBus {
    sender: mpsc::Sender<SimulationEvent>,
    receiver: mpsc::Receiver<SimulationEvent>,
    sinks: Vec<Box<dyn EventSink>>,
    /// Frame stamped onto emitted events. 0 is setup.
    frame: u64,
    /// Events handed to sinks since creation.
    delivered: u64,
    finalized: bool,
    /// Disabled bus is a no-op.
    enabled: bool,
}

impl EventBus {
    /// Creates a new event bus with no sinks, positioned at frame 0.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            sinks: Vec::new(),
            frame: 0,
            delivered: 0,
            finalized: false,
            enabled: true,
        }
    }

    /// Registers a sink to receive events.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Enables or disables the bus. A disabled bus drops events silently.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled && !self.finalized
    }

    /// Stamp subsequent events with `frame`.
    pub fn begin_frame(&mut self, frame: u64) {
        self.frame = frame;
    }

    /// Frame that the next event will carry.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Queue an event for the current frame.
    pub fn emit(&self, kind: EventKind) {
        if !self.is_enabled() {
            return;
        }
        // The receiver lives as long as the bus.
        let _ = self.sender.send(SimulationEvent::new(self.frame, kind));
    }

    /// Deliver every queued event to every sink, in emission order.
    ///
    /// Returns the number of events delivered.
    pub fn flush(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(event) = self.receiver.try_recv() {
            for sink in &mut self.sinks {
                sink.handle(&event);
            }
            delivered += 1;
        }
        self.delivered += delivered as u64;
        delivered
    }

    /// Flush pending events, then let each sink finish up. Only the first
    /// call reaches the sinks; the bus drops events afterwards.
    pub fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        self.flush();
        for sink in &mut self.sinks {
            sink.finalize();
        }
        self.finalized = true;
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Events delivered to sinks over the bus lifetime.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Returns the number of registered sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
