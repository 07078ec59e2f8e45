//! Solver strategy trait, the seam between the world and the integrator.

use billow_math::Vec3;
use billow_types::BillowResult;

use crate::anchor::AnchorSet;
use crate::config::SolverConfig;
use crate::constraint::ConstraintSet;
use crate::force::ForceField;
use crate::state::SimulationState;

/// Result of one fixed step.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Constraint relaxation passes performed.
    pub iterations: u32,
    /// Largest constraint violation after relaxation.
    pub max_constraint_error: f32,
    /// Particles projected above the ground plane.
    pub grounded: u32,
    /// Wall-clock time for this step (seconds).
    pub wall_time: f64,
}

/// Everything a fixed step reads besides the particle state.
pub struct StepInput<'a> {
    pub constraints: &'a ConstraintSet,
    pub anchors: &'a AnchorSet,
    pub forces: &'a dyn ForceField,
    pub gravity: Vec3,
    pub dt: f32,
}

/// Trait for fixed-step cloth solvers.
///
/// ```text
/// solver.init(config)?;
/// loop {
///     solver.step(state, input)?;
/// }
/// ```
pub trait SolverStrategy: Send {
    /// Initialize the solver with its configuration.
    fn init(&mut self, config: &SolverConfig) -> BillowResult<()>;

    /// Advance `state` by one fixed step of `input.dt`.
    ///
    /// Accumulated external forces are consumed and cleared.
    fn step(&mut self, state: &mut SimulationState, input: &StepInput<'_>) -> BillowResult<StepResult>;

    /// Returns the solver's name.
    fn name(&self) -> &str;
}
