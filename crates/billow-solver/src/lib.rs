//! # billow-solver
//!
//! The cloth physics core: particle state, distance constraints, anchors,
//! the fixed-step solver, and the wall-clock stepper that drives it.
//!
//! ## Key Types
//!
//! - [`SimulationState`] — SoA buffers for positions, velocities, forces, masses
//! - [`ConstraintSet`] — distance constraints between particles and anchors
//! - [`AnchorSet`] — immovable tether points
//! - [`SolverStrategy`] — pluggable fixed-step solver trait
//! - [`PositionBasedSolver`] — semi-implicit Euler + iterative constraint projection
//! - [`FixedStepper`] — maps wall-clock time to a capped number of fixed steps
//! - [`GravityRamp`] — time-based gravity interpolation
//! - [`ClothWorld`] — owns all of the above for one cloth

pub mod anchor;
pub mod config;
pub mod constraint;
pub mod force;
pub mod gravity;
pub mod pbd;
pub mod state;
pub mod stepper;
pub mod strategy;
pub mod world;

pub use anchor::AnchorSet;
pub use config::SolverConfig;
pub use constraint::{BodyRef, ConstraintSet, DistanceConstraint};
pub use force::{ForceField, NoForce, UniformForce};
pub use gravity::GravityRamp;
pub use pbd::PositionBasedSolver;
pub use state::SimulationState;
pub use stepper::{substeps_for, FixedStepper, StepPlan, StepperMode};
pub use strategy::{SolverStrategy, StepInput, StepResult};
pub use world::{ClothWorld, NetworkSpec};
