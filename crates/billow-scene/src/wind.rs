//! Flow field as a per-particle force.

use billow_field::FlowField;
use billow_math::Vec3;
use billow_solver::ForceField;
use billow_types::ParticleId;

/// Applies the flow-field cell under each particle's `(x, z)` position.
///
/// Positions outside the cloth footprint read the nearest edge cell.
pub struct WindForce<'a> {
    field: &'a FlowField,
    width: f32,
    depth: f32,
}

impl<'a> WindForce<'a> {
    /// Wind over a `width × depth` footprint centred on the origin.
    pub fn new(field: &'a FlowField, width: f32, depth: f32) -> Self {
        Self {
            field,
            width,
            depth,
        }
    }
}

impl ForceField for WindForce<'_> {
    fn force_at(&self, _particle: ParticleId, position: Vec3) -> Vec3 {
        self.field
            .sample_world(position.x, position.z, self.width, self.depth)
    }
}
