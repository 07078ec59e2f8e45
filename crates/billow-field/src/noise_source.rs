//! Vector noise source.
//!
//! Wraps the `noise` crate's gradient noise behind a small trait so the
//! flow field can be driven by a fixed function in tests.

use noise::{NoiseFn, OpenSimplex, Perlin};
use serde::{Deserialize, Serialize};

/// A smooth, deterministic scalar noise function of three inputs.
///
/// Implementations must return values in `[-1, 1]` for any finite input
/// and must not panic on large magnitudes.
pub trait NoiseSource: Send + Sync {
    /// Sample the noise at `(x, y, z)`.
    fn sample(&self, x: f64, y: f64, z: f64) -> f64;

    /// Returns the noise's name.
    fn name(&self) -> &str;
}

/// Which gradient noise to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseKind {
    /// Classic Perlin noise.
    Perlin,
    /// OpenSimplex noise.
    #[default]
    Simplex,
}

/// Seeded gradient noise.
#[derive(Clone)]
pub struct CoherentNoise {
    inner: Inner,
    seed: u32,
}

#[derive(Clone)]
enum Inner {
    Perlin(Perlin),
    Simplex(OpenSimplex),
}

impl CoherentNoise {
    /// Creates a noise source of the given kind. Identical `(kind, seed)`
    /// pairs sample identically.
    pub fn new(kind: NoiseKind, seed: u32) -> Self {
        let inner = match kind {
            NoiseKind::Perlin => Inner::Perlin(Perlin::new(seed)),
            NoiseKind::Simplex => Inner::Simplex(OpenSimplex::new(seed)),
        };
        Self { inner, seed }
    }

    /// The seed this source was built with.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// The noise kind.
    pub fn kind(&self) -> NoiseKind {
        match self.inner {
            Inner::Perlin(_) => NoiseKind::Perlin,
            Inner::Simplex(_) => NoiseKind::Simplex,
        }
    }
}

impl NoiseSource for CoherentNoise {
    fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let point = [x, y, z];
        let value = match &self.inner {
            Inner::Perlin(n) => n.get(point),
            Inner::Simplex(n) => n.get(point),
        };
        // The gradient tables can overshoot the unit range by a hair.
        if value.is_finite() {
            value.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }

    fn name(&self) -> &str {
        match self.inner {
            Inner::Perlin(_) => "perlin",
            Inner::Simplex(_) => "open_simplex",
        }
    }
}
