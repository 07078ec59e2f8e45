//! The cloth world: one particle network with its constraints, anchors
//! and solver, created and released together.

use tracing::debug;

use billow_math::Vec3;
use billow_mesh::topology::{ConstraintTopology, Weave};
use billow_mesh::Lattice;
use billow_types::{BillowResult, ParticleId};

use crate::anchor::AnchorSet;
use crate::config::SolverConfig;
use crate::constraint::ConstraintSet;
use crate::force::ForceField;
use crate::pbd::PositionBasedSolver;
use crate::state::SimulationState;
use crate::strategy::{SolverStrategy, StepInput, StepResult};

/// Fabric layout and mass.
#[derive(Debug, Clone)]
pub struct NetworkSpec {
    pub lattice: Lattice,
    pub weave: Weave,
    /// Y of the flat starting sheet.
    pub start_height: f32,
    /// Total cloth mass, split uniformly across particles.
    pub total_mass: f32,
    /// Particles fixed in place from the start.
    pub pinned: Vec<ParticleId>,
}

/// A particle-constraint network plus everything needed to step it.
pub struct ClothWorld {
    lattice: Lattice,
    state: SimulationState,
    constraints: ConstraintSet,
    anchors: AnchorSet,
    solver: Box<dyn SolverStrategy>,
    gravity: Vec3,
    fixed_dt: f32,
    steps_taken: u64,
}

impl ClothWorld {
    /// Build a world with the default [`PositionBasedSolver`].
    pub fn build(spec: &NetworkSpec, anchors: AnchorSet, config: &SolverConfig) -> BillowResult<Self> {
        Self::with_solver(spec, anchors, config, Box::new(PositionBasedSolver::new()))
    }

    /// Build a world with a specific solver.
    ///
    /// Topology and rest lengths are fixed here; tether constraints are
    /// appended after the fabric constraints.
    pub fn with_solver(
        spec: &NetworkSpec,
        anchors: AnchorSet,
        config: &SolverConfig,
        mut solver: Box<dyn SolverStrategy>,
    ) -> BillowResult<Self> {
        config.validate()?;
        solver.init(config)?;

        let mut state = SimulationState::from_lattice(&spec.lattice, spec.start_height, spec.total_mass)?;
        state.ground_height = config.ground_height;
        for &id in &spec.pinned {
            state.pin(id)?;
        }

        let topology = ConstraintTopology::build(&spec.lattice, spec.weave);
        let mut constraints = ConstraintSet::from_topology(&topology, &state);
        constraints.add_tethers(&anchors);

        debug!(
            particles = state.particle_count,
            constraints = constraints.len(),
            anchors = anchors.len(),
            solver = solver.name(),
            "cloth world built"
        );

        Ok(Self {
            lattice: spec.lattice,
            state,
            constraints,
            anchors,
            solver,
            gravity: Vec3::from_array(config.gravity),
            fixed_dt: config.fixed_dt,
            steps_taken: 0,
        })
    }

    /// Run one fixed step, querying `forces` for every free particle.
    pub fn step(&mut self, forces: &dyn ForceField) -> BillowResult<StepResult> {
        let input = StepInput {
            constraints: &self.constraints,
            anchors: &self.anchors,
            forces,
            gravity: self.gravity,
            dt: self.fixed_dt,
        };
        let result = self.solver.step(&mut self.state, &input)?;
        self.steps_taken += 1;
        Ok(result)
    }

    /// Run `steps` fixed steps. Returns the last step's result, if any ran.
    pub fn advance(&mut self, steps: u32, forces: &dyn ForceField) -> BillowResult<Option<StepResult>> {
        let mut last = None;
        for _ in 0..steps {
            last = Some(self.step(forces)?);
        }
        Ok(last)
    }

    /// Accumulate an external force on a particle for the next step only.
    pub fn apply_force(&mut self, id: ParticleId, force: Vec3) -> BillowResult<bool> {
        self.state.apply_force(id, force)
    }

    /// Current gravity.
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Replace gravity for subsequent steps.
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    /// Set only the vertical gravity component.
    pub fn set_gravity_y(&mut self, gy: f32) {
        self.gravity.y = gy;
    }

    /// Fixed timestep (seconds).
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Fixed steps run so far.
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Position of the particle at lattice `(x, y)`.
    pub fn particle_position(&self, x: usize, y: usize) -> BillowResult<Vec3> {
        let id = self.lattice.checked_id(x, y)?;
        Ok(self.state.position(id.index()))
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn anchors(&self) -> &AnchorSet {
        &self.anchors
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    /// Largest constraint violation in the current state.
    pub fn max_constraint_error(&self) -> f32 {
        self.constraints.max_error(&self.state, &self.anchors)
    }
}
