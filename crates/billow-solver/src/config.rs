//! Solver configuration.
//!
//! Parameters that control stepping: timestep, iteration counts,
//! catch-up limits, gravity and damping.

use serde::{Deserialize, Serialize};

use billow_types::constants::{
    DEFAULT_COLD_START_STEPS, DEFAULT_FIXED_DT, DEFAULT_LINEAR_DAMPING, DEFAULT_MAX_SUBSTEPS,
    DEFAULT_SOLVER_ITERATIONS,
};
use billow_types::{BillowError, BillowResult};

/// Configuration for the cloth solver and stepper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Constraint relaxation passes per fixed step.
    pub iterations: u32,

    /// Fixed timestep (seconds).
    pub fixed_dt: f32,

    /// Fixed steps run on the first stepper call, before any wall-clock
    /// interval is known.
    pub cold_start_steps: u32,

    /// Most fixed steps a single stepper call may run. Elapsed time
    /// beyond this is dropped.
    pub max_substeps: u32,

    /// Gravity vector [gx, gy, gz].
    pub gravity: [f32; 3],

    /// Linear damping coefficient (velocity scaled by `(1 - d)^dt`).
    pub linear_damping: f32,

    /// Optional ground plane height (Y). Particles are kept above it.
    #[serde(default)]
    pub ground_height: Option<f32>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_SOLVER_ITERATIONS,
            fixed_dt: DEFAULT_FIXED_DT,
            cold_start_steps: DEFAULT_COLD_START_STEPS,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
            gravity: [0.0, -9.81, 0.0],
            linear_damping: DEFAULT_LINEAR_DAMPING,
            ground_height: None,
        }
    }
}

impl SolverConfig {
    /// Check that every value is usable.
    pub fn validate(&self) -> BillowResult<()> {
        if self.iterations == 0 {
            return Err(BillowError::InvalidConfig("iterations must be at least 1".into()));
        }
        if !(self.fixed_dt > 0.0 && self.fixed_dt.is_finite()) {
            return Err(BillowError::InvalidConfig(format!(
                "fixed_dt must be positive and finite (got {})",
                self.fixed_dt
            )));
        }
        if self.max_substeps == 0 {
            return Err(BillowError::InvalidConfig("max_substeps must be at least 1".into()));
        }
        if self.cold_start_steps > self.max_substeps {
            return Err(BillowError::InvalidConfig(format!(
                "cold_start_steps ({}) exceeds max_substeps ({})",
                self.cold_start_steps, self.max_substeps
            )));
        }
        if !self.gravity.iter().all(|g| g.is_finite()) {
            return Err(BillowError::InvalidConfig("gravity must be finite".into()));
        }
        if !(0.0..=1.0).contains(&self.linear_damping) {
            return Err(BillowError::InvalidConfig(format!(
                "linear_damping must be within [0, 1] (got {})",
                self.linear_damping
            )));
        }
        if let Some(h) = self.ground_height {
            if !h.is_finite() {
                return Err(BillowError::InvalidConfig("ground_height must be finite".into()));
            }
        }
        Ok(())
    }
}
