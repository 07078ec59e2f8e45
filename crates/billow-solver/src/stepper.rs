//! Wall-clock to fixed-step conversion.
//!
//! The first call has no previous timestamp and runs a fixed cold-start
//! batch. Every later call runs `ceil(elapsed / fixed_dt)` steps, capped at
//! `max_substeps`. When the cap bites, the excess elapsed time is dropped:
//! after a stall the cloth slows down for a frame instead of the frame
//! loop spiralling into ever longer catch-up batches.

use crate::config::SolverConfig;

/// Which branch produced a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepperMode {
    /// First call: fixed cold-start batch.
    Cold,
    /// Later calls: steps derived from elapsed time.
    Warm,
}

/// How many fixed steps to run for one call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    pub mode: StepperMode,
    /// Fixed steps to run now.
    pub steps: u32,
    /// Steps the elapsed time asked for before capping.
    pub requested: u32,
    /// Wall-clock seconds since the previous call (0 when cold).
    pub elapsed: f64,
    /// Seconds discarded by the cap.
    pub dropped: f64,
}

impl StepPlan {
    /// True when the cap cut this plan short.
    pub fn was_capped(&self) -> bool {
        self.requested > self.steps
    }
}

/// Tolerance so an interval of exactly `n · fixed_dt` is not rounded up
/// to `n + 1` by float noise.
const STEP_ROUNDING_SLACK: f64 = 1e-9;

/// Uncapped step count for an elapsed interval: `ceil(dt / fixed_dt)`.
///
/// Non-positive or NaN intervals need no steps. Monotone in `dt`.
pub fn substeps_for(dt: f64, fixed_dt: f64) -> u32 {
    if !(dt > 0.0) || !(fixed_dt > 0.0) {
        return 0;
    }
    let steps = (dt / fixed_dt - STEP_ROUNDING_SLACK).ceil();
    if steps >= u32::MAX as f64 {
        u32::MAX
    } else {
        steps.max(0.0) as u32
    }
}

/// Converts wall-clock timestamps into fixed-step counts.
#[derive(Debug, Clone)]
pub struct FixedStepper {
    fixed_dt: f64,
    cold_start_steps: u32,
    max_substeps: u32,
    last_call: Option<f64>,
}

impl FixedStepper {
    /// Creates a stepper in the cold state.
    pub fn new(fixed_dt: f32, cold_start_steps: u32, max_substeps: u32) -> Self {
        Self {
            fixed_dt: fixed_dt as f64,
            cold_start_steps,
            max_substeps: max_substeps.max(1),
            last_call: None,
        }
    }

    /// Creates a stepper from solver configuration.
    pub fn from_config(config: &SolverConfig) -> Self {
        Self::new(config.fixed_dt, config.cold_start_steps, config.max_substeps)
    }

    /// Plan the steps for a call at wall-clock time `now` (seconds) and
    /// record `now` as the last call time.
    ///
    /// A clock that goes backwards yields zero steps.
    pub fn plan(&mut self, now: f64) -> StepPlan {
        let plan = match self.last_call {
            None => StepPlan {
                mode: StepperMode::Cold,
                steps: self.cold_start_steps,
                requested: self.cold_start_steps,
                elapsed: 0.0,
                dropped: 0.0,
            },
            Some(last) => {
                let elapsed = (now - last).max(0.0);
                let requested = substeps_for(elapsed, self.fixed_dt);
                let steps = requested.min(self.max_substeps);
                let dropped = if requested > steps {
                    (elapsed - steps as f64 * self.fixed_dt).max(0.0)
                } else {
                    0.0
                };
                StepPlan {
                    mode: StepperMode::Warm,
                    steps,
                    requested,
                    elapsed,
                    dropped,
                }
            }
        };
        self.last_call = Some(now);
        plan
    }

    /// Whether a previous call has been recorded.
    pub fn is_warm(&self) -> bool {
        self.last_call.is_some()
    }

    /// Time of the previous call.
    pub fn last_call(&self) -> Option<f64> {
        self.last_call
    }

    /// Fixed timestep (seconds).
    pub fn fixed_dt(&self) -> f64 {
        self.fixed_dt
    }

    /// Return to the cold state.
    pub fn reset(&mut self) {
        self.last_call = None;
    }
}
