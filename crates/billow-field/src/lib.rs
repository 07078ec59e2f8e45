//! # billow-field
//!
//! External wind forces for the cloth.
//!
//! ## Key Types
//!
//! - [`NoiseSource`] — deterministic 3-in/1-out coherent noise in `[-1, 1]`
//! - [`CoherentNoise`] — seeded Perlin / OpenSimplex implementation
//! - [`PointerState`] — latest pointer position, shared with the input handler
//! - [`FlowField`] — square grid of wind vectors, regenerated every frame

pub mod flow_field;
pub mod noise_source;
pub mod pointer;

pub use flow_field::{checked_cell_count, FlowField, FlowFieldGenerator, WindStrength};
pub use noise_source::{CoherentNoise, NoiseKind, NoiseSource};
pub use pointer::{PointerSample, PointerState};
