//! Simulation state: SoA buffers for all per-particle data.
//!
//! This is the primary mutable data structure during simulation.
//! The solver reads and writes these buffers each fixed step; the
//! particle count and masses never change after construction.

use billow_math::Vec3;
use billow_mesh::Lattice;
use billow_types::{BillowError, BillowResult, ParticleId};

/// SoA simulation state buffers.
///
/// All arrays have length `particle_count`, in lattice id order:
/// ```text
/// pos_x: [x0, x1, x2, ...]
/// pos_y: [y0, y1, y2, ...]
/// ...
/// ```
pub struct SimulationState {
    /// Number of particles.
    pub particle_count: usize,

    // ─── Position (current) ───
    pub pos_x: Vec<f32>,
    pub pos_y: Vec<f32>,
    pub pos_z: Vec<f32>,

    // ─── Velocity ───
    pub vel_x: Vec<f32>,
    pub vel_y: Vec<f32>,
    pub vel_z: Vec<f32>,

    // ─── Position at the start of the current step ───
    pub prev_x: Vec<f32>,
    pub prev_y: Vec<f32>,
    pub prev_z: Vec<f32>,

    // ─── External force accumulated for the current step ───
    pub force_x: Vec<f32>,
    pub force_y: Vec<f32>,
    pub force_z: Vec<f32>,

    // ─── Per-particle mass (inverse mass 0 = immovable) ───
    pub mass: Vec<f32>,
    pub inv_mass: Vec<f32>,

    /// Optional ground plane height (Y coordinate).
    pub ground_height: Option<f32>,
}

impl SimulationState {
    /// Small clearance kept between particles and the ground plane.
    pub const GROUND_CLEARANCE: f32 = 0.005;

    /// Initialize state from explicit positions with a uniform particle mass.
    ///
    /// Velocities start at zero. `particle_mass` must be positive.
    pub fn from_positions(positions: &[Vec3], particle_mass: f32) -> BillowResult<Self> {
        if !(particle_mass > 0.0 && particle_mass.is_finite()) {
            return Err(BillowError::InvalidConfig(format!(
                "particle mass must be positive and finite (got {particle_mass})"
            )));
        }

        let n = positions.len();
        let pos_x: Vec<f32> = positions.iter().map(|p| p.x).collect();
        let pos_y: Vec<f32> = positions.iter().map(|p| p.y).collect();
        let pos_z: Vec<f32> = positions.iter().map(|p| p.z).collect();

        Ok(Self {
            particle_count: n,
            prev_x: pos_x.clone(),
            prev_y: pos_y.clone(),
            prev_z: pos_z.clone(),
            pos_x,
            pos_y,
            pos_z,
            vel_x: vec![0.0; n],
            vel_y: vec![0.0; n],
            vel_z: vec![0.0; n],
            force_x: vec![0.0; n],
            force_y: vec![0.0; n],
            force_z: vec![0.0; n],
            mass: vec![particle_mass; n],
            inv_mass: vec![1.0 / particle_mass; n],
            ground_height: None,
        })
    }

    /// Initialize state for a lattice hanging at `start_height`.
    ///
    /// Every particle gets `total_mass / segments_x * segments_y`.
    pub fn from_lattice(lattice: &Lattice, start_height: f32, total_mass: f32) -> BillowResult<Self> {
        if !(total_mass > 0.0 && total_mass.is_finite()) {
            return Err(BillowError::InvalidConfig(format!(
                "total mass must be positive and finite (got {total_mass})"
            )));
        }
        let particle_mass = total_mass / lattice.segments_x as f32 * lattice.segments_y as f32;
        Self::from_positions(&lattice.hanging_positions(start_height), particle_mass)
    }

    fn check(&self, id: ParticleId) -> BillowResult<usize> {
        let i = id.index();
        if i < self.particle_count {
            Ok(i)
        } else {
            Err(BillowError::UnknownParticle(id.0))
        }
    }

    /// Position of particle `i`.
    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::new(self.pos_x[i], self.pos_y[i], self.pos_z[i])
    }

    /// Overwrite the position of particle `i`.
    #[inline]
    pub fn set_position(&mut self, i: usize, p: Vec3) {
        self.pos_x[i] = p.x;
        self.pos_y[i] = p.y;
        self.pos_z[i] = p.z;
    }

    /// Velocity of particle `i`.
    #[inline]
    pub fn velocity(&self, i: usize) -> Vec3 {
        Vec3::new(self.vel_x[i], self.vel_y[i], self.vel_z[i])
    }

    /// Whether particle `i` is moved by forces.
    #[inline]
    pub fn is_free(&self, i: usize) -> bool {
        self.inv_mass[i] > 0.0
    }

    /// Make a particle immovable (infinite mass).
    pub fn pin(&mut self, id: ParticleId) -> BillowResult<()> {
        let i = self.check(id)?;
        self.inv_mass[i] = 0.0;
        self.vel_x[i] = 0.0;
        self.vel_y[i] = 0.0;
        self.vel_z[i] = 0.0;
        Ok(())
    }

    /// Accumulate an external force on a particle for the current step.
    ///
    /// Returns `Ok(false)` without touching anything when the particle is
    /// immovable.
    pub fn apply_force(&mut self, id: ParticleId, force: Vec3) -> BillowResult<bool> {
        let i = self.check(id)?;
        if !self.is_free(i) {
            return Ok(false);
        }
        self.add_force(i, force);
        Ok(true)
    }

    /// Unchecked accumulation used inside the solver loop.
    #[inline]
    pub(crate) fn add_force(&mut self, i: usize, force: Vec3) {
        self.force_x[i] += force.x;
        self.force_y[i] += force.y;
        self.force_z[i] += force.z;
    }

    /// Accumulated force on particle `i`.
    #[inline]
    pub fn force(&self, i: usize) -> Vec3 {
        Vec3::new(self.force_x[i], self.force_y[i], self.force_z[i])
    }

    /// Drop all accumulated forces.
    pub fn clear_forces(&mut self) {
        self.force_x.fill(0.0);
        self.force_y.fill(0.0);
        self.force_z.fill(0.0);
    }

    /// Save current positions as "previous" for this step.
    pub fn save_previous(&mut self) {
        self.prev_x.copy_from_slice(&self.pos_x);
        self.prev_y.copy_from_slice(&self.pos_y);
        self.prev_z.copy_from_slice(&self.pos_z);
    }

    /// Semi-implicit Euler: `v += f/m · dt`, `v *= (1 - damping)^dt`,
    /// `p += v · dt`. Immovable particles are skipped.
    pub fn integrate(&mut self, dt: f32, damping: f32) {
        let damp = (1.0 - damping).powf(dt);
        for i in 0..self.particle_count {
            let w = self.inv_mass[i];
            if w == 0.0 {
                continue;
            }
            self.vel_x[i] = (self.vel_x[i] + self.force_x[i] * w * dt) * damp;
            self.vel_y[i] = (self.vel_y[i] + self.force_y[i] * w * dt) * damp;
            self.vel_z[i] = (self.vel_z[i] + self.force_z[i] * w * dt) * damp;

            self.pos_x[i] += self.vel_x[i] * dt;
            self.pos_y[i] += self.vel_y[i] * dt;
            self.pos_z[i] += self.vel_z[i] * dt;
        }
    }

    /// Update velocities from position change: v = (p_new - p_old) / dt.
    pub fn update_velocities(&mut self, dt: f32) {
        let inv_dt = 1.0 / dt;
        for i in 0..self.particle_count {
            self.vel_x[i] = (self.pos_x[i] - self.prev_x[i]) * inv_dt;
            self.vel_y[i] = (self.pos_y[i] - self.prev_y[i]) * inv_dt;
            self.vel_z[i] = (self.pos_z[i] - self.prev_z[i]) * inv_dt;
        }
    }

    /// Project free particles above the ground plane.
    pub fn enforce_ground(&mut self) -> u32 {
        let Some(ground_y) = self.ground_height else {
            return 0;
        };
        let surface = ground_y + Self::GROUND_CLEARANCE;
        let mut resolved = 0;
        for i in 0..self.particle_count {
            if self.is_free(i) && self.pos_y[i] < surface {
                self.pos_y[i] = surface;
                resolved += 1;
            }
        }
        resolved
    }

    /// Zero downward velocity and apply friction for grounded particles.
    pub fn enforce_ground_velocities(&mut self) {
        let Some(ground_y) = self.ground_height else {
            return;
        };
        let surface = ground_y + Self::GROUND_CLEARANCE;
        for i in 0..self.particle_count {
            if self.is_free(i) && self.pos_y[i] <= surface {
                if self.vel_y[i] < 0.0 {
                    self.vel_y[i] = 0.0;
                }
                self.vel_x[i] *= 0.5;
                self.vel_z[i] *= 0.5;
            }
        }
    }

    /// Compute total kinetic energy: 0.5 * Σ m_i * ||v_i||².
    pub fn kinetic_energy(&self) -> f64 {
        let mut energy = 0.0f64;
        for i in 0..self.particle_count {
            if !self.is_free(i) {
                continue;
            }
            let vx = self.vel_x[i] as f64;
            let vy = self.vel_y[i] as f64;
            let vz = self.vel_z[i] as f64;
            energy += 0.5 * self.mass[i] as f64 * (vx * vx + vy * vy + vz * vz);
        }
        energy
    }
}
