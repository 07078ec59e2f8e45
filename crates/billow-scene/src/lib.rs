//! # billow-scene
//!
//! Wires the physics core into a running sketch: configuration, the two
//! preset variants, the wind adapter, the setup/frame/dispose lifecycle
//! and a headless frame loop.
//!
//! ## Key Types
//!
//! - [`SketchConfig`] — every recognised option, TOML round-trippable
//! - [`Variant`] — `Billow` (dense weave, rising) and `Settle` (sparse, falling)
//! - [`ClothSketch`] — owns one cloth world from `setup` to `dispose`
//! - [`WindForce`] — samples a flow field per particle
//! - [`Clock`] — wall-clock source, [`SystemClock`] or [`SteppedClock`]
//! - [`FrameLoop`] — drives a sketch for a number of frames into a renderer

pub mod clock;
pub mod config;
pub mod frame_loop;
pub mod sketch;
pub mod wind;

pub use clock::{Clock, SteppedClock, SystemClock};
pub use config::{AnchorPoint, ClothConfig, GravityConfig, RampConfig, SketchConfig, Variant, WindConfig};
pub use frame_loop::{FrameLoop, LoopSummary};
pub use sketch::{ClothSketch, FrameReport};
pub use wind::WindForce;
