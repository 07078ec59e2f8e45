//! Sketch configuration.
//!
//! One struct holds every option a sketch recognises. The two variants
//! are presets over it; a TOML file can override any field.

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use billow_field::{checked_cell_count, NoiseKind};
use billow_mesh::{Lattice, Weave};
use billow_solver::SolverConfig;
use billow_types::constants::{
    DEFAULT_COLD_START_STEPS, DEFAULT_FIELD_TIME_SCALE, DEFAULT_FIXED_DT, DEFAULT_FLOW_FIELD_SIZE,
    DEFAULT_LINEAR_DAMPING, DEFAULT_MAX_SUBSTEPS, DEFAULT_NOISE_FREQUENCY,
    DEFAULT_SOLVER_ITERATIONS,
};
use billow_types::{BillowError, BillowResult};

/// Which preset sketch to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Dense weave lifted by upward gravity and wind, held by slack tethers.
    Billow,
    /// Sparse weave pinned at its corners, gravity ramping downward.
    Settle,
}

impl Variant {
    /// Returns all variants.
    pub fn all() -> &'static [Variant] {
        &[Variant::Billow, Variant::Settle]
    }

    /// Returns a human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Billow => "billow",
            Variant::Settle => "settle",
        }
    }
}

/// Cloth dimensions and lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClothConfig {
    /// World-space extent along X.
    pub width: f32,
    /// World-space extent along Z.
    pub height: f32,
    pub segments_x: usize,
    pub segments_y: usize,
    /// Total cloth mass, split uniformly over the particles.
    pub mass: f32,
    pub weave: Weave,
}

/// Wind flow-field options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindConfig {
    pub enabled: bool,
    /// Base length of every wind vector.
    pub strength: f32,
    pub noise: NoiseKind,
    pub seed: u32,
    /// Side length of the square flow-field grid.
    pub flow_field_size: usize,
    /// Spatial frequency applied to grid coordinates before sampling.
    pub frequency: f64,
    /// Wall-clock seconds to noise time offset.
    pub time_scale: f64,
}

/// A gravity change from the starting value to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RampConfig {
    pub target: f32,
    pub duration_ms: f64,
}

/// Vertical gravity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravityConfig {
    /// Gravity at setup. Positive is up.
    pub initial: f32,
    /// Optional ramp, started by the first frame.
    #[serde(default)]
    pub ramp: Option<RampConfig>,
}

/// One anchor: a fixed world position tethered to a lattice particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorPoint {
    pub position: [f32; 3],
    /// Lattice coordinates `[x, y]` of the tethered particle.
    pub particle: [usize; 2],
}

/// Complete configuration for one sketch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchConfig {
    /// Height the cloth starts at.
    pub floor: f32,
    /// Ground plane sits this far below `floor`. `None` disables it.
    #[serde(default)]
    pub ground_offset: Option<f32>,

    /// Rest length of every anchor tether.
    pub tether_length: f32,

    /// Fixed steps run at setup, with wind from time offset 0.
    pub warmup_steps: u32,

    /// Constraint relaxation passes per fixed step.
    pub iterations: u32,
    /// Fixed timestep (seconds).
    pub fixed_dt: f32,
    pub cold_start_steps: u32,
    /// Catch-up cap per frame.
    pub max_substeps: u32,
    pub linear_damping: f32,

    pub cloth: ClothConfig,
    pub wind: WindConfig,
    pub gravity: GravityConfig,
    #[serde(default)]
    pub anchors: Vec<AnchorPoint>,
}

impl SketchConfig {
    /// The `Billow` preset: wind strength drawn from `[3, 6)`, random seed.
    pub fn billow<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut config = Self::billow_base();
        config.wind.strength = rng.gen_range(3.0..6.0);
        config.wind.seed = rng.gen();
        config
    }

    /// The `Settle` preset: wind strength drawn from `[1, 9)`, random seed.
    pub fn settle<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut config = Self::settle_base();
        config.wind.strength = rng.gen_range(1.0..9.0);
        config.wind.seed = rng.gen();
        config
    }

    /// Build a preset by variant.
    pub fn for_variant<R: Rng + ?Sized>(variant: Variant, rng: &mut R) -> Self {
        match variant {
            Variant::Billow => Self::billow(rng),
            Variant::Settle => Self::settle(rng),
        }
    }

    fn billow_base() -> Self {
        let segments = 24;
        let floor = -2.0;
        let (cx, cy) = (segments / 2, segments / 2);
        let anchors = [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)]
            .into_iter()
            .map(|(ax, az): (f32, f32)| AnchorPoint {
                position: [ax, floor + 2.0, az],
                particle: [
                    if ax < 0.0 { cx - 1 } else { cx + 1 },
                    if az < 0.0 { cy - 1 } else { cy + 1 },
                ],
            })
            .collect();

        Self {
            cloth: ClothConfig {
                width: 10.0,
                height: 10.0,
                segments_x: segments,
                segments_y: segments,
                mass: 1.0,
                weave: Weave::Dense,
            },
            wind: WindConfig {
                enabled: true,
                strength: 4.5,
                noise: NoiseKind::default(),
                seed: 0,
                flow_field_size: DEFAULT_FLOW_FIELD_SIZE,
                frequency: DEFAULT_NOISE_FREQUENCY,
                time_scale: DEFAULT_FIELD_TIME_SCALE,
            },
            gravity: GravityConfig {
                initial: 2.0,
                ramp: None,
            },
            floor,
            ground_offset: Some(1.0),
            tether_length: 2.0,
            anchors,
            warmup_steps: 22,
            iterations: DEFAULT_SOLVER_ITERATIONS,
            fixed_dt: DEFAULT_FIXED_DT,
            cold_start_steps: DEFAULT_COLD_START_STEPS,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
            linear_damping: DEFAULT_LINEAR_DAMPING,
        }
    }

    fn settle_base() -> Self {
        let segments = 20;
        let (width, height) = (10.0f32, 10.0f32);
        let floor = -2.0;
        let last = segments - 1;
        let corners = [
            ([-0.5, -0.5], [1, 1]),
            ([0.5, -0.5], [last, 1]),
            ([-0.5, 0.5], [1, last]),
            ([0.5, 0.5], [last, last]),
        ];
        let anchors = corners
            .into_iter()
            .map(|([fx, fz], particle)| AnchorPoint {
                position: [fx * width, floor, fz * height],
                particle,
            })
            .collect();

        let base = Self::billow_base();
        Self {
            cloth: ClothConfig {
                width,
                height,
                segments_x: segments,
                segments_y: segments,
                mass: 3.0,
                weave: Weave::Sparse,
            },
            gravity: GravityConfig {
                initial: 2.0,
                ramp: Some(RampConfig {
                    target: -5.0,
                    duration_ms: 2000.0,
                }),
            },
            floor,
            tether_length: 0.0,
            anchors,
            warmup_steps: 0,
            ..base
        }
    }

    /// The lattice this config describes.
    pub fn lattice(&self) -> BillowResult<Lattice> {
        Lattice::new(
            self.cloth.segments_x,
            self.cloth.segments_y,
            self.cloth.width,
            self.cloth.height,
        )
    }

    /// Ground plane height, if enabled.
    pub fn ground_height(&self) -> Option<f32> {
        self.ground_offset.map(|offset| self.floor - offset)
    }

    /// Solver parameters derived from this config.
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            iterations: self.iterations,
            fixed_dt: self.fixed_dt,
            cold_start_steps: self.cold_start_steps,
            max_substeps: self.max_substeps,
            gravity: [0.0, self.gravity.initial, 0.0],
            linear_damping: self.linear_damping,
            ground_height: self.ground_height(),
        }
    }

    /// Check that every value is usable. A config that passes builds a
    /// sketch without overflowing any grid or id.
    pub fn validate(&self) -> BillowResult<()> {
        let lattice = self.lattice()?;

        if !(self.cloth.mass > 0.0 && self.cloth.mass.is_finite()) {
            return Err(invalid(format!("cloth mass must be positive (got {})", self.cloth.mass)));
        }
        if self.wind.flow_field_size == 0 {
            return Err(invalid("flow_field_size must be at least 1".into()));
        }
        checked_cell_count(self.wind.flow_field_size)?;
        if !(self.wind.strength.is_finite() && self.wind.strength >= 0.0) {
            return Err(invalid(format!(
                "wind strength must be non-negative (got {})",
                self.wind.strength
            )));
        }
        if !self.wind.frequency.is_finite() || !self.wind.time_scale.is_finite() {
            return Err(invalid("noise frequency and time_scale must be finite".into()));
        }
        if !self.floor.is_finite() || !self.gravity.initial.is_finite() {
            return Err(invalid("floor and gravity must be finite".into()));
        }
        if let Some(offset) = self.ground_offset {
            if !offset.is_finite() {
                return Err(invalid("ground_offset must be finite".into()));
            }
        }
        if let Some(ramp) = self.gravity.ramp {
            if !ramp.target.is_finite() || !(ramp.duration_ms >= 0.0) {
                return Err(invalid(format!("invalid gravity ramp {ramp:?}")));
            }
        }
        if !(self.tether_length >= 0.0 && self.tether_length.is_finite()) {
            return Err(invalid(format!(
                "tether_length must be non-negative (got {})",
                self.tether_length
            )));
        }
        for anchor in &self.anchors {
            let [x, y] = anchor.particle;
            lattice.checked_id(x, y)?;
            if !anchor.position.iter().all(|c| c.is_finite()) {
                return Err(invalid(format!("anchor position {:?} is not finite", anchor.position)));
            }
        }

        self.solver_config().validate()
    }

    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> BillowResult<Self> {
        toml::from_str(text).map_err(|e| BillowError::Serialization(format!("invalid config: {e}")))
    }

    /// Serialize to TOML text.
    pub fn to_toml_string(&self) -> BillowResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| BillowError::Serialization(format!("TOML serialization failed: {e}")))
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> BillowResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

impl Default for SketchConfig {
    /// The `Billow` preset with a mid-range wind strength and seed 0.
    fn default() -> Self {
        Self::billow_base()
    }
}

fn invalid(message: String) -> BillowError {
    BillowError::InvalidConfig(message)
}
