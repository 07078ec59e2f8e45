//! Lattice dimensions and particle indexing.
//!
//! Particle `(x, y)` has id `x * (Ny + 1) + y`. The same order is used by
//! the surface sampler, so vertex `k` of the output buffer is particle `k`.

use serde::{Deserialize, Serialize};

use billow_math::Vec3;
use billow_types::constants::MAX_PARTICLES;
use billow_types::{BillowError, BillowResult, ParticleId};

/// A rectangular cloth lattice of `segments_x × segments_y` cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    /// Cells along X (particle columns = segments_x + 1).
    pub segments_x: usize,
    /// Cells along Z (particle rows = segments_y + 1).
    pub segments_y: usize,
    /// World-space width along X.
    pub width: f32,
    /// World-space depth along Z.
    pub height: f32,
}

impl Lattice {
    /// Creates a lattice, rejecting zero segment counts, non-positive or
    /// non-finite extents, and particle counts that do not fit a `u32` id.
    pub fn new(segments_x: usize, segments_y: usize, width: f32, height: f32) -> BillowResult<Self> {
        if segments_x == 0 || segments_y == 0 {
            return Err(BillowError::InvalidLattice(format!(
                "segment counts must be positive (got {segments_x}×{segments_y})"
            )));
        }
        if !(width > 0.0 && width.is_finite() && height > 0.0 && height.is_finite()) {
            return Err(BillowError::InvalidLattice(format!(
                "extent must be positive and finite (got {width}×{height})"
            )));
        }
        let lattice = Self {
            segments_x,
            segments_y,
            width,
            height,
        };
        if lattice.checked_particle_count().is_none() {
            return Err(BillowError::InvalidLattice(format!(
                "{segments_x}×{segments_y} lattice exceeds {MAX_PARTICLES} particles"
            )));
        }
        Ok(lattice)
    }

    /// Particle columns (`Nx + 1`).
    #[inline]
    pub fn columns(&self) -> usize {
        self.segments_x.saturating_add(1)
    }

    /// Particle rows (`Ny + 1`).
    #[inline]
    pub fn rows(&self) -> usize {
        self.segments_y.saturating_add(1)
    }

    /// Total particle count. Saturates for a lattice [`Lattice::new`]
    /// would reject.
    #[inline]
    pub fn particle_count(&self) -> usize {
        self.columns().saturating_mul(self.rows())
    }

    /// Total particle count, or `None` when it exceeds [`MAX_PARTICLES`].
    pub fn checked_particle_count(&self) -> Option<usize> {
        let columns = self.segments_x.checked_add(1)?;
        let rows = self.segments_y.checked_add(1)?;
        columns.checked_mul(rows).filter(|&n| n <= MAX_PARTICLES)
    }

    /// Rest spacing between neighbouring particles along X.
    #[inline]
    pub fn spacing_x(&self) -> f32 {
        self.width / self.segments_x as f32
    }

    /// Rest spacing between neighbouring particles along Z.
    #[inline]
    pub fn spacing_y(&self) -> f32 {
        self.height / self.segments_y as f32
    }

    /// Id of particle `(x, y)`. Panics in debug builds when out of range;
    /// use [`Lattice::checked_id`] for untrusted coordinates.
    #[inline]
    pub fn id(&self, x: usize, y: usize) -> ParticleId {
        debug_assert!(x <= self.segments_x && y <= self.segments_y);
        ParticleId((x * self.rows() + y) as u32)
    }

    /// Id of particle `(x, y)`, or an error when outside the lattice.
    pub fn checked_id(&self, x: usize, y: usize) -> BillowResult<ParticleId> {
        if x > self.segments_x || y > self.segments_y {
            return Err(BillowError::InvalidLattice(format!(
                "particle ({x}, {y}) outside {}×{} lattice",
                self.columns(),
                self.rows()
            )));
        }
        Ok(self.id(x, y))
    }

    /// Lattice coordinates of a particle id.
    #[inline]
    pub fn coords(&self, id: ParticleId) -> (usize, usize) {
        let i = id.index();
        (i / self.rows(), i % self.rows())
    }

    /// Initial layout: a flat sheet in the XZ plane centred on the origin,
    /// raised to `y = height_offset`. Returned in id order.
    pub fn hanging_positions(&self, height_offset: f32) -> Vec<Vec3> {
        let dx = self.spacing_x();
        let dz = self.spacing_y();
        let half_x = self.segments_x as f32 * 0.5;
        let half_z = self.segments_y as f32 * 0.5;

        let mut positions = Vec::with_capacity(self.particle_count());
        for x in 0..self.columns() {
            for y in 0..self.rows() {
                positions.push(Vec3::new(
                    (x as f32 - half_x) * dx,
                    height_offset,
                    (y as f32 - half_z) * dz,
                ));
            }
        }
        positions
    }
}
