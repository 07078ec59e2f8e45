//! # billow-types
//!
//! Shared types, identifiers, error types, and physical constants
//! for the billow cloth simulation.
//!
//! This crate has zero domain logic. It defines the vocabulary
//! that all other billow crates share.

pub mod constants;
pub mod error;
pub mod ids;

pub use error::{BillowError, BillowResult};
pub use ids::{AnchorId, ConstraintId, ParticleId};
