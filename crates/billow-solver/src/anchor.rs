//! Anchor system.
//!
//! Anchors are zero-mass bodies at fixed world positions. Each one is
//! tethered to a single fabric particle by a distance constraint, pinning
//! the cloth without fixing any particle outright. Anchors are created
//! once and never move.

use billow_math::Vec3;
use billow_types::{AnchorId, BillowError, BillowResult, ParticleId};

/// One anchor–particle tether.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tether {
    pub anchor: AnchorId,
    pub particle: ParticleId,
    pub length: f32,
}

/// The immovable anchor bodies and their tethers.
#[derive(Debug, Clone, Default)]
pub struct AnchorSet {
    positions: Vec<Vec3>,
    tethers: Vec<Tether>,
}

impl AnchorSet {
    /// An empty set (no anchors).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build anchors at `positions`, tethering anchor `k` to `tethered[k]`
    /// with rest length `tether_length`.
    ///
    /// A zero `tether_length` pulls the particle onto the anchor; a positive
    /// one leaves it slack within that radius.
    pub fn build(
        positions: &[Vec3],
        tethered: &[ParticleId],
        tether_length: f32,
        particle_count: usize,
    ) -> BillowResult<Self> {
        if positions.len() != tethered.len() {
            return Err(BillowError::InvalidConfig(format!(
                "{} anchor positions but {} tethered particles",
                positions.len(),
                tethered.len()
            )));
        }
        if positions.len() > u16::MAX as usize {
            return Err(BillowError::InvalidConfig("too many anchors".into()));
        }
        if !(tether_length >= 0.0 && tether_length.is_finite()) {
            return Err(BillowError::InvalidConfig(format!(
                "tether length must be non-negative and finite (got {tether_length})"
            )));
        }
        if let Some(p) = positions.iter().find(|p| !p.is_finite()) {
            return Err(BillowError::InvalidConfig(format!("anchor position {p} is not finite")));
        }
        if let Some(bad) = tethered.iter().find(|id| id.index() >= particle_count) {
            return Err(BillowError::UnknownParticle(bad.0));
        }

        let tethers = tethered
            .iter()
            .enumerate()
            .map(|(k, &particle)| Tether {
                anchor: AnchorId(k as u16),
                particle,
                length: tether_length,
            })
            .collect();

        Ok(Self {
            positions: positions.to_vec(),
            tethers,
        })
    }

    /// Number of anchors.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when there are no anchors.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of an anchor.
    #[inline]
    pub fn position(&self, id: AnchorId) -> Vec3 {
        self.positions[id.index()]
    }

    /// All anchor positions.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// All tethers.
    pub fn tethers(&self) -> &[Tether] {
        &self.tethers
    }
}
