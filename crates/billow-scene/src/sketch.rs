//! Sketch lifecycle: `setup`, `frame`, `dispose`.
//!
//! A sketch owns exactly one cloth world. `setup` allocates it and runs
//! the warm-up; each `frame` ramps gravity, regenerates the wind field,
//! runs the planned fixed steps and samples the surface; `dispose`
//! releases everything and may be called any number of times.

use std::sync::Arc;
use std::time::Instant;

use billow_field::{CoherentNoise, FlowField, FlowFieldGenerator, PointerState, WindStrength};
use billow_math::Vec3;
use billow_render::SurfaceSampler;
use billow_solver::{
    AnchorSet, ClothWorld, FixedStepper, GravityRamp, NetworkSpec, NoForce, StepPlan,
    StepperMode,
};
use billow_telemetry::{EventBus, EventKind, EventSink};
use billow_types::{BillowError, BillowResult, ParticleId};

use crate::config::SketchConfig;
use crate::wind::WindForce;

/// What one frame did.
#[derive(Debug, Clone)]
pub struct FrameReport {
    /// Frame number, starting at 1 (setup is frame 0).
    pub frame: u64,
    pub plan: StepPlan,
    /// Vertical gravity used by this frame's steps.
    pub gravity_y: f32,
    /// Wind vector length this frame, or `None` with wind disabled.
    pub wind_magnitude: Option<f32>,
    pub max_constraint_error: f32,
}

/// Everything allocated by `setup` and released by `dispose`.
struct Resources {
    world: ClothWorld,
    stepper: FixedStepper,
    ramp: Option<GravityRamp>,
    generator: Option<FlowFieldGenerator>,
    field: Option<FlowField>,
    sampler: SurfaceSampler,
    pointer: Arc<PointerState>,
}

/// A running cloth sketch.
pub struct ClothSketch {
    config: SketchConfig,
    resources: Option<Resources>,
    bus: EventBus,
    frame: u64,
}

impl ClothSketch {
    /// Validate `config`, build the cloth world and run the warm-up.
    ///
    /// `pointer` is shared with whatever input handler writes pointer
    /// moves; the sketch reads it once per frame.
    pub fn setup(config: SketchConfig, pointer: Arc<PointerState>) -> BillowResult<Self> {
        config.validate()?;

        let lattice = config.lattice()?;
        let spec = NetworkSpec {
            lattice,
            weave: config.cloth.weave,
            start_height: config.floor,
            total_mass: config.cloth.mass,
            pinned: Vec::new(),
        };

        let positions: Vec<Vec3> = config
            .anchors
            .iter()
            .map(|a| Vec3::from_array(a.position))
            .collect();
        let tethered = config
            .anchors
            .iter()
            .map(|a| lattice.checked_id(a.particle[0], a.particle[1]))
            .collect::<BillowResult<Vec<ParticleId>>>()?;
        let anchors = AnchorSet::build(
            &positions,
            &tethered,
            config.tether_length,
            lattice.particle_count(),
        )?;

        let solver_config = config.solver_config();
        let world = ClothWorld::build(&spec, anchors, &solver_config)?;

        let generator = config.wind.enabled.then(|| {
            FlowFieldGenerator::new(
                Box::new(CoherentNoise::new(config.wind.noise, config.wind.seed)),
                config.wind.flow_field_size,
                config.wind.frequency,
            )
        });

        let ramp = config
            .gravity
            .ramp
            .map(|r| GravityRamp::new(config.gravity.initial, r.target, r.duration_ms));

        let mut resources = Resources {
            sampler: SurfaceSampler::new(lattice.particle_count()),
            stepper: FixedStepper::from_config(&solver_config),
            world,
            ramp,
            generator,
            field: None,
            pointer,
        };

        resources.warm_up(&config)?;
        resources.sampler.sample(resources.world.state())?;

        tracing::info!(
            particles = lattice.particle_count(),
            constraints = resources.world.constraints().len(),
            anchors = resources.world.anchors().len(),
            warmup_steps = config.warmup_steps,
            wind = config.wind.enabled,
            "sketch ready"
        );

        let bus = EventBus::new();
        bus.emit(EventKind::SetupComplete {
            particles: lattice.particle_count() as u32,
            constraints: resources.world.constraints().len() as u32,
            anchors: resources.world.anchors().len() as u32,
            warmup_steps: config.warmup_steps,
        });

        Ok(Self {
            config,
            resources: Some(resources),
            bus,
            frame: 0,
        })
    }

    /// Registers a telemetry sink. Events queued since setup reach it on
    /// the next frame.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.bus.add_sink(sink);
    }

    /// Advance the sketch to wall-clock time `now` (seconds).
    ///
    /// Fails with [`BillowError::Disposed`] after `dispose`.
    pub fn frame(&mut self, now: f64) -> BillowResult<FrameReport> {
        let started = Instant::now();
        let res = self.resources.as_mut().ok_or(BillowError::Disposed)?;
        let frame = self.frame + 1;
        self.bus.begin_frame(frame);
        let bus = &self.bus;
        bus.emit(EventKind::FrameBegin { now });

        if let Some(ramp) = res.ramp.as_mut() {
            let gy = ramp.update(now);
            if gy != res.world.gravity().y {
                res.world.set_gravity_y(gy);
                bus.emit(EventKind::GravityChanged { gy });
            }
        }

        let wind_magnitude = match res.generator.as_ref() {
            Some(generator) => {
                let strength = WindStrength {
                    wind_strength: self.config.wind.strength,
                    pointer: res.pointer.sample(),
                };
                let time_offset = now * self.config.wind.time_scale;
                res.field = Some(generator.generate(time_offset, &strength)?);
                bus.emit(EventKind::WindUpdated {
                    magnitude: strength.magnitude(),
                    time_offset,
                });
                Some(strength.magnitude())
            }
            None => None,
        };

        let plan = res.stepper.plan(now);
        bus.emit(EventKind::Substeps {
            cold: plan.mode == StepperMode::Cold,
            steps: plan.steps,
        });
        if plan.was_capped() {
            bus.emit(EventKind::CatchUpClamped {
                requested: plan.requested,
                executed: plan.steps,
                dropped: plan.dropped,
            });
        }

        res.run_steps(plan.steps, self.config.cloth.width, self.config.cloth.height)?;
        res.sampler.sample(res.world.state())?;

        let max_constraint_error = res.world.max_constraint_error();
        bus.emit(EventKind::ConstraintError {
            max_error: max_constraint_error,
        });
        bus.emit(EventKind::Energy {
            kinetic: res.world.state().kinetic_energy(),
        });
        bus.emit(EventKind::FrameEnd {
            wall_time: started.elapsed().as_secs_f64(),
        });

        let gravity_y = res.world.gravity().y;
        self.bus.flush();
        self.frame = frame;

        Ok(FrameReport {
            frame,
            plan,
            gravity_y,
            wind_magnitude,
            max_constraint_error,
        })
    }

    /// Release the world, field, sampler and pointer handle.
    ///
    /// Returns `true` if anything was released; later calls are no-ops.
    pub fn dispose(&mut self) -> bool {
        let Some(resources) = self.resources.take() else {
            return false;
        };
        drop(resources);
        self.bus.emit(EventKind::Disposed);
        self.bus.finalize();
        tracing::info!(frames = self.frame, "sketch disposed");
        true
    }

    pub fn is_disposed(&self) -> bool {
        self.resources.is_none()
    }

    /// The sampled vertex buffer from the latest frame (or setup).
    pub fn vertices(&self) -> Option<&[f32]> {
        self.resources.as_ref().map(|r| r.sampler.buffer())
    }

    pub fn world(&self) -> Option<&ClothWorld> {
        self.resources.as_ref().map(|r| &r.world)
    }

    /// The flow field used by the latest frame.
    pub fn flow_field(&self) -> Option<&FlowField> {
        self.resources.as_ref().and_then(|r| r.field.as_ref())
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    /// Frames run so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}

impl Resources {
    fn warm_up(&mut self, config: &SketchConfig) -> BillowResult<()> {
        if config.warmup_steps == 0 {
            return Ok(());
        }
        if let Some(generator) = self.generator.as_ref() {
            let strength = WindStrength {
                wind_strength: config.wind.strength,
                pointer: self.pointer.sample(),
            };
            self.field = Some(generator.generate(0.0, &strength)?);
        }
        self.run_steps(config.warmup_steps, config.cloth.width, config.cloth.height)?;
        tracing::debug!(steps = config.warmup_steps, "warm-up complete");
        Ok(())
    }

    /// Run `steps` fixed steps with the current wind field on every one.
    fn run_steps(&mut self, steps: u32, width: f32, depth: f32) -> BillowResult<()> {
        match self.field.as_ref() {
            Some(field) => self.world.advance(steps, &WindForce::new(field, width, depth))?,
            None => self.world.advance(steps, &NoForce)?,
        };
        Ok(())
    }
}

impl Drop for ClothSketch {
    fn drop(&mut self) {
        self.dispose();
    }
}
