//! # billow-math
//!
//! Vector primitives for the billow cloth simulation.
//!
//! Provides:
//! - Re-exports of `glam` types (`Vec2`, `Vec3`)
//! - Guarded normalization and separation helpers that never divide by zero

pub mod guarded;

// Re-export glam types as the canonical math types for billow.
pub use glam::{Vec2, Vec3};

pub use guarded::{clamped_cell, normalize_clamped, separation};
