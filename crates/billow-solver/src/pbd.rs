//! Position-based cloth solver.
//!
//! Each fixed step:
//! 1. accumulate gravity (`m · g`) and external forces on free particles
//! 2. semi-implicit Euler integration with linear damping
//! 3. Gauss–Seidel relaxation of every distance constraint, `iterations` passes
//! 4. ground projection, velocity update from the position change
//! 5. clear accumulated forces

use std::time::Instant;

use billow_types::{BillowError, BillowResult, ParticleId};

use crate::anchor::AnchorSet;
use crate::config::SolverConfig;
use crate::constraint::ConstraintSet;
use crate::state::SimulationState;
use crate::strategy::{SolverStrategy, StepInput, StepResult};

/// Semi-implicit Euler integrator with iterative distance-constraint
/// projection.
pub struct PositionBasedSolver {
    iterations: u32,
    damping: f32,
    initialized: bool,
}

impl PositionBasedSolver {
    /// Creates an uninitialized solver.
    pub fn new() -> Self {
        Self {
            iterations: 0,
            damping: 0.0,
            initialized: false,
        }
    }

    /// Run `iterations` projection passes over every active constraint.
    ///
    /// Corrections are split by inverse mass, so anchors and pinned
    /// particles never move. Returns the largest remaining violation.
    pub fn relax(
        state: &mut SimulationState,
        constraints: &ConstraintSet,
        anchors: &AnchorSet,
        iterations: u32,
    ) -> f32 {
        for _ in 0..iterations {
            for c in constraints.active() {
                ConstraintSet::project(state, anchors, c);
            }
        }
        constraints.max_error(state, anchors)
    }
}

impl Default for PositionBasedSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverStrategy for PositionBasedSolver {
    fn init(&mut self, config: &SolverConfig) -> BillowResult<()> {
        config.validate()?;
        self.iterations = config.iterations;
        self.damping = config.linear_damping;
        self.initialized = true;
        Ok(())
    }

    fn step(&mut self, state: &mut SimulationState, input: &StepInput<'_>) -> BillowResult<StepResult> {
        let start = Instant::now();

        if !self.initialized {
            return Err(BillowError::InvalidConfig(
                "Solver not initialized. Call init() first.".into(),
            ));
        }

        // 1. Gravity and external forces
        for i in 0..state.particle_count {
            if !state.is_free(i) {
                continue;
            }
            let external = input.forces.force_at(ParticleId(i as u32), state.position(i));
            state.add_force(i, input.gravity * state.mass[i] + external);
        }

        // 2. Integrate
        state.save_previous();
        state.integrate(input.dt, self.damping);

        // 3. Constraint relaxation
        let max_constraint_error =
            Self::relax(state, input.constraints, input.anchors, self.iterations);

        // 4. Ground, then velocities from the corrected positions
        let grounded = state.enforce_ground();
        state.update_velocities(input.dt);
        state.enforce_ground_velocities();

        // 5. Forces only live for one step
        state.clear_forces();

        Ok(StepResult {
            iterations: self.iterations,
            max_constraint_error,
            grounded,
            wall_time: start.elapsed().as_secs_f64(),
        })
    }

    fn name(&self) -> &str {
        "position_based"
    }
}
