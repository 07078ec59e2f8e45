//! Simulation defaults shared by every crate.

/// Fixed physics timestep (seconds). 1/60th of a second.
pub const DEFAULT_FIXED_DT: f32 = 1.0 / 60.0;

/// Constraint relaxation passes per fixed step.
pub const DEFAULT_SOLVER_ITERATIONS: u32 = 10;

/// Fixed steps run on the very first stepper call.
pub const DEFAULT_COLD_START_STEPS: u32 = 2;

/// Upper bound on fixed steps per stepper call. Elapsed time beyond
/// `MAX_SUBSTEPS * fixed_dt` is dropped.
pub const DEFAULT_MAX_SUBSTEPS: u32 = 8;

/// Linear damping coefficient applied as `v *= (1 - d)^dt`.
pub const DEFAULT_LINEAR_DAMPING: f32 = 0.5;

/// Spatial frequency used when sampling noise for the flow field.
pub const DEFAULT_NOISE_FREQUENCY: f64 = 0.1;

/// Side length of the wind flow-field grid.
pub const DEFAULT_FLOW_FIELD_SIZE: usize = 32;

/// Largest accepted flow-field side length.
pub const MAX_FLOW_FIELD_SIZE: usize = 4096;

/// Largest accepted particle count. Particle ids are `u32`.
pub const MAX_PARTICLES: usize = u32::MAX as usize;

/// Converts wall-clock seconds to flow-field time offset.
pub const DEFAULT_FIELD_TIME_SCALE: f64 = 0.1;

/// Epsilon guarding normalizations and constraint projections.
pub const EPSILON: f32 = 1.0e-6;
