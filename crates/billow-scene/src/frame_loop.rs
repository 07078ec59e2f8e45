//! Headless frame loop.
//!
//! Stands in for the host's display-refresh callback: reads the clock,
//! runs one sketch frame, hands the sampled vertices to a renderer.

use std::time::{Duration, Instant};

use billow_render::{RenderFrame, Renderer};
use billow_types::{BillowError, BillowResult};

use crate::clock::Clock;
use crate::sketch::ClothSketch;

/// Totals for one [`FrameLoop::run`].
#[derive(Debug, Clone, Default)]
pub struct LoopSummary {
    pub frames: u64,
    /// Fixed steps run across all frames.
    pub steps: u64,
    /// Frames whose catch-up was capped.
    pub capped_frames: u64,
    /// Simulated seconds dropped by the cap.
    pub dropped_time: f64,
    pub final_kinetic_energy: f64,
    pub final_constraint_error: f32,
    pub total_wall_time: f64,
}

/// Drives a sketch for a fixed number of frames.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    frames: u64,
    /// Sleep between frames to hold this interval; `None` runs flat out.
    pace: Option<Duration>,
}

impl FrameLoop {
    pub fn new(frames: u64) -> Self {
        Self { frames, pace: None }
    }

    /// Hold roughly `fps` frames per second of real time.
    pub fn paced(mut self, fps: f64) -> Self {
        self.pace = (fps > 0.0 && fps.is_finite()).then(|| Duration::from_secs_f64(1.0 / fps));
        self
    }

    /// Run the loop, then finalize the renderer. The sketch is left
    /// alive; disposing it is the caller's call.
    pub fn run(
        &self,
        sketch: &mut ClothSketch,
        clock: &mut dyn Clock,
        renderer: &mut dyn Renderer,
    ) -> BillowResult<LoopSummary> {
        let lattice = *sketch.world().ok_or(BillowError::Disposed)?.lattice();
        renderer.init(&lattice)?;

        let total_start = Instant::now();
        let mut summary = LoopSummary::default();

        for _ in 0..self.frames {
            let frame_start = Instant::now();
            let report = sketch.frame(clock.now())?;

            summary.frames += 1;
            summary.steps += report.plan.steps as u64;
            if report.plan.was_capped() {
                summary.capped_frames += 1;
                summary.dropped_time += report.plan.dropped;
            }
            summary.final_constraint_error = report.max_constraint_error;

            let vertices = sketch.vertices().ok_or(BillowError::Disposed)?;
            renderer.submit_frame(&RenderFrame::new(report.frame, vertices))?;

            if let Some(interval) = self.pace {
                if let Some(rest) = interval.checked_sub(frame_start.elapsed()) {
                    std::thread::sleep(rest);
                }
            }
        }

        renderer.finalize()?;

        summary.final_kinetic_energy = sketch
            .world()
            .map(|w| w.state().kinetic_energy())
            .unwrap_or(0.0);
        summary.total_wall_time = total_start.elapsed().as_secs_f64();

        tracing::info!(
            renderer = renderer.name(),
            frames = summary.frames,
            steps = summary.steps,
            capped = summary.capped_frames,
            "frame loop finished"
        );
        Ok(summary)
    }
}
