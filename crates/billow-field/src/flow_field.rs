//! Wind flow field.
//!
//! A square grid of force vectors rebuilt from scratch every frame. The
//! only state carried between frames is the time offset the caller passes
//! in; noise parameters move continuously with time, so the grid is
//! never patched incrementally.

use billow_math::{clamped_cell, normalize_clamped, Vec3};
use billow_types::constants::{EPSILON, MAX_FLOW_FIELD_SIZE};
use billow_types::{BillowError, BillowResult};

use crate::noise_source::NoiseSource;
use crate::pointer::PointerSample;

/// Scalar inputs that set the length of every wind vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindStrength {
    /// Base wind strength.
    pub wind_strength: f32,
    /// Latest pointer position.
    pub pointer: PointerSample,
}

impl WindStrength {
    /// Length of every generated vector: `wind_strength + 2 · |pointer|`.
    pub fn magnitude(&self) -> f32 {
        self.wind_strength + 2.0 * self.pointer.magnitude()
    }
}

/// A `size × size` grid of wind vectors, indexed `[gy][gx]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowField {
    size: usize,
    cells: Vec<Vec3>,
}

impl FlowField {
    /// Build a flow field.
    ///
    /// Cell `(x, y)` samples the noise at `(x·f, t, y·f)` and `(x·f, y·f, t)`
    /// to get `nx, ny`, then stores `normalize(nx, 1 + ny, 0) · magnitude`.
    /// The `+1` bias leans every vector upward. When both samples are near
    /// −1 and 0 the candidate is near zero; normalization divides by
    /// `max(len, EPSILON)` so that cell comes out short instead of NaN.
    ///
    /// Fails when `size` exceeds [`MAX_FLOW_FIELD_SIZE`].
    pub fn generate<N: NoiseSource + ?Sized>(
        noise: &N,
        size: usize,
        frequency: f64,
        time_offset: f64,
        strength: &WindStrength,
    ) -> BillowResult<Self> {
        let cell_count = checked_cell_count(size)?;
        let magnitude = strength.magnitude();
        let mut cells = Vec::with_capacity(cell_count);

        for y in 0..size {
            for x in 0..size {
                let fx = x as f64 * frequency;
                let fy = y as f64 * frequency;
                let nx = noise.sample(fx, time_offset, fy) as f32;
                let ny = noise.sample(fx, fy, time_offset) as f32;

                let candidate = Vec3::new(nx, 1.0 + ny, 0.0);
                cells.push(normalize_clamped(candidate, EPSILON) * magnitude);
            }
        }

        Ok(Self { size, cells })
    }

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.size
    }

    /// All vectors in row-major order (`gy * size + gx`).
    pub fn cells(&self) -> &[Vec3] {
        &self.cells
    }

    /// Vector at `(gx, gy)`, or `None` outside the grid.
    pub fn get(&self, gx: usize, gy: usize) -> Option<Vec3> {
        if gx >= self.size || gy >= self.size {
            return None;
        }
        self.cells.get(gy * self.size + gx).copied()
    }

    /// Grid cell covering world position `(x, z)` for a cloth footprint of
    /// `width × depth` centred on the origin. Always in range.
    pub fn cell_for(&self, x: f32, z: f32, width: f32, depth: f32) -> (usize, usize) {
        let gx = clamped_cell(x, -width * 0.5, width, self.size);
        let gy = clamped_cell(z, -depth * 0.5, depth, self.size);
        (gx, gy)
    }

    /// Wind vector acting at world position `(x, z)`. Zero for an empty grid.
    pub fn sample_world(&self, x: f32, z: f32, width: f32, depth: f32) -> Vec3 {
        let (gx, gy) = self.cell_for(x, z, width, depth);
        self.get(gx, gy).unwrap_or(Vec3::ZERO)
    }
}

/// Owns a noise source and the fixed grid parameters, and rebuilds the
/// field on demand.
pub struct FlowFieldGenerator {
    noise: Box<dyn NoiseSource>,
    size: usize,
    frequency: f64,
}

impl FlowFieldGenerator {
    /// Creates a generator for a `size × size` grid.
    pub fn new(noise: Box<dyn NoiseSource>, size: usize, frequency: f64) -> Self {
        Self {
            noise,
            size,
            frequency,
        }
    }

    /// Regenerate the field at `time_offset`.
    pub fn generate(&self, time_offset: f64, strength: &WindStrength) -> BillowResult<FlowField> {
        FlowField::generate(self.noise.as_ref(), self.size, self.frequency, time_offset, strength)
    }

    /// Grid side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The noise source.
    pub fn noise(&self) -> &dyn NoiseSource {
        self.noise.as_ref()
    }
}

/// `size²`, or an error when the grid is larger than the supported maximum.
pub fn checked_cell_count(size: usize) -> BillowResult<usize> {
    size.checked_mul(size)
        .filter(|_| size <= MAX_FLOW_FIELD_SIZE)
        .ok_or_else(|| {
            BillowError::InvalidConfig(format!(
                "flow field size {size} exceeds the maximum of {MAX_FLOW_FIELD_SIZE}"
            ))
        })
}
