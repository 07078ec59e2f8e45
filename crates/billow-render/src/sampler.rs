//! Flat vertex buffer extraction.

use billow_solver::SimulationState;
use billow_types::{BillowError, BillowResult, ParticleId};

/// Copies particle positions into an interleaved `[x, y, z, ...]` buffer.
///
/// Particle `id` lands at offset `id · 3`, so the buffer follows the
/// lattice's id order. The buffer is allocated once and reused.
#[derive(Debug, Clone)]
pub struct SurfaceSampler {
    buffer: Vec<f32>,
}

impl SurfaceSampler {
    /// Creates a zeroed buffer for `particle_count` vertices.
    pub fn new(particle_count: usize) -> Self {
        Self {
            buffer: vec![0.0; particle_count * 3],
        }
    }

    /// Refresh the buffer from `state` and return it.
    ///
    /// Fails if the state's particle count differs from the one the
    /// sampler was created for.
    pub fn sample(&mut self, state: &SimulationState) -> BillowResult<&[f32]> {
        if state.particle_count != self.vertex_count() {
            return Err(BillowError::InvalidLattice(format!(
                "sampler sized for {} vertices, state has {}",
                self.vertex_count(),
                state.particle_count
            )));
        }
        for (i, v) in self.buffer.chunks_exact_mut(3).enumerate() {
            v[0] = state.pos_x[i];
            v[1] = state.pos_y[i];
            v[2] = state.pos_z[i];
        }
        Ok(&self.buffer)
    }

    /// The most recently sampled buffer.
    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / 3
    }

    /// Sampled position of one particle, if it exists.
    pub fn vertex(&self, id: ParticleId) -> Option<[f32; 3]> {
        let offset = id.index() * 3;
        self.buffer
            .get(offset..offset + 3)
            .map(|v| [v[0], v[1], v[2]])
    }
}
