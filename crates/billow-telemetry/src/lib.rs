//! # billow-telemetry
//!
//! Event bus for sketch telemetry. Frames, sub-step batches, dropped
//! catch-up time, gravity changes and energy snapshots are emitted as
//! structured events and consumed by pluggable sinks.
//!
//! ## Key Types
//!
//! - [`EventBus`] — collects events and dispatches them to sinks on flush
//! - [`SimulationEvent`] / [`EventKind`] — event payloads
//! - [`EventSink`] — consumer trait, with [`VecSink`] and [`TracingSink`]

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::EventBus;
pub use events::{EventKind, SimulationEvent};
pub use sinks::{EventSink, TracingSink, VecSink};
