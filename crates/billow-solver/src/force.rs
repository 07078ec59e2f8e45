//! External force sources sampled once per particle per fixed step.

use billow_math::Vec3;
use billow_types::ParticleId;

/// Supplies an external force for each free particle at each fixed step.
///
/// Wind is the main implementation; it is queried on every sub-step so a
/// frame that runs several steps applies wind on each of them.
pub trait ForceField {
    /// Force acting on `particle`, currently at `position`.
    fn force_at(&self, particle: ParticleId, position: Vec3) -> Vec3;
}

/// No external force.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoForce;

impl ForceField for NoForce {
    fn force_at(&self, _particle: ParticleId, _position: Vec3) -> Vec3 {
        Vec3::ZERO
    }
}

/// The same force on every particle.
#[derive(Debug, Clone, Copy)]
pub struct UniformForce(pub Vec3);

impl ForceField for UniformForce {
    fn force_at(&self, _particle: ParticleId, _position: Vec3) -> Vec3 {
        self.0
    }
}
