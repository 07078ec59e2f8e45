//! Distance constraints.
//!
//! A constraint names its two participants by id ([`BodyRef`]) rather
//! than holding references; particles and anchors live in their own
//! arenas. Rest lengths are captured once and never change. Removing a
//! constraint only marks it inactive so ids stay stable.

use billow_math::{separation, Vec3};
use billow_mesh::topology::{ConstraintTopology, EdgeKind};
use billow_types::{AnchorId, BillowError, BillowResult, ConstraintId, ParticleId};

use crate::anchor::AnchorSet;
use crate::state::SimulationState;

/// A constraint participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRef {
    Particle(ParticleId),
    Anchor(AnchorId),
}

/// What produced a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Structural,
    Shear,
    Tether,
}

/// Keeps two bodies `rest_length` apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceConstraint {
    pub a: BodyRef,
    pub b: BodyRef,
    rest_length: f32,
    pub kind: ConstraintKind,
    pub active: bool,
}

impl DistanceConstraint {
    /// Creates an active constraint. Negative or non-finite rest lengths
    /// are clamped to zero.
    pub fn new(a: BodyRef, b: BodyRef, rest_length: f32, kind: ConstraintKind) -> Self {
        let rest_length = if rest_length.is_finite() { rest_length.max(0.0) } else { 0.0 };
        Self {
            a,
            b,
            rest_length,
            kind,
            active: true,
        }
    }

    /// The separation this constraint restores.
    #[inline]
    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }
}

/// Resolves a body to `(position, inverse mass)`.
#[inline]
pub(crate) fn body(state: &SimulationState, anchors: &AnchorSet, r: BodyRef) -> (Vec3, f32) {
    match r {
        BodyRef::Particle(id) => (state.position(id.index()), state.inv_mass[id.index()]),
        BodyRef::Anchor(id) => (anchors.position(id), 0.0),
    }
}

/// All distance constraints of one cloth.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    constraints: Vec<DistanceConstraint>,
}

impl ConstraintSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// One constraint per topology edge, rest length = current separation.
    pub fn from_topology(topology: &ConstraintTopology, state: &SimulationState) -> Self {
        let constraints = topology
            .edges
            .iter()
            .map(|e| {
                let rest = state.position(e.a.index()).distance(state.position(e.b.index()));
                let kind = match e.kind {
                    EdgeKind::Structural => ConstraintKind::Structural,
                    EdgeKind::Shear => ConstraintKind::Shear,
                };
                DistanceConstraint::new(BodyRef::Particle(e.a), BodyRef::Particle(e.b), rest, kind)
            })
            .collect();
        Self { constraints }
    }

    /// Append one constraint per anchor tether, using the tether length.
    pub fn add_tethers(&mut self, anchors: &AnchorSet) {
        for t in anchors.tethers() {
            self.push_unchecked(DistanceConstraint::new(
                BodyRef::Particle(t.particle),
                BodyRef::Anchor(t.anchor),
                t.length,
                ConstraintKind::Tether,
            ));
        }
    }

    /// Append a constraint and return its id.
    ///
    /// Both participants must exist in `state` and `anchors`; relaxation
    /// indexes them directly.
    pub fn push(
        &mut self,
        constraint: DistanceConstraint,
        state: &SimulationState,
        anchors: &AnchorSet,
    ) -> BillowResult<ConstraintId> {
        for body in [constraint.a, constraint.b] {
            match body {
                BodyRef::Particle(id) if id.index() >= state.particle_count => {
                    return Err(BillowError::UnknownParticle(id.0));
                }
                BodyRef::Anchor(id) if id.index() >= anchors.len() => {
                    return Err(BillowError::UnknownAnchor(u32::from(id.0)));
                }
                _ => {}
            }
        }
        Ok(self.push_unchecked(constraint))
    }

    fn push_unchecked(&mut self, constraint: DistanceConstraint) -> ConstraintId {
        let id = ConstraintId(self.constraints.len() as u32);
        self.constraints.push(constraint);
        id
    }

    /// Mark a constraint inactive. Returns false for an unknown id.
    pub fn deactivate(&mut self, id: ConstraintId) -> bool {
        match self.constraints.get_mut(id.index()) {
            Some(c) => {
                c.active = false;
                true
            }
            None => false,
        }
    }

    /// Constraint by id.
    pub fn get(&self, id: ConstraintId) -> Option<&DistanceConstraint> {
        self.constraints.get(id.index())
    }

    /// Total number of constraints, active or not.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// True when the set holds no constraints.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Iterator over active constraints.
    pub fn active(&self) -> impl Iterator<Item = &DistanceConstraint> {
        self.constraints.iter().filter(|c| c.active)
    }

    /// Largest `|separation - rest_length|` over active constraints.
    pub fn max_error(&self, state: &SimulationState, anchors: &AnchorSet) -> f32 {
        self.active()
            .map(|c| {
                let (pa, _) = body(state, anchors, c.a);
                let (pb, _) = body(state, anchors, c.b);
                (pa.distance(pb) - c.rest_length).abs()
            })
            .fold(0.0, f32::max)
    }

    /// Move the participants of `c` toward its rest length, split by
    /// inverse mass. Coincident participants and pairs of immovable
    /// bodies are left alone.
    #[inline]
    pub(crate) fn project(state: &mut SimulationState, anchors: &AnchorSet, c: &DistanceConstraint) {
        let (pa, wa) = body(state, anchors, c.a);
        let (pb, wb) = body(state, anchors, c.b);
        let w = wa + wb;
        if w <= 0.0 {
            return;
        }
        let Some((delta, dist)) = separation(pa, pb) else {
            return;
        };
        let correction = delta * ((dist - c.rest_length) / (dist * w));
        if let BodyRef::Particle(id) = c.a {
            state.set_position(id.index(), pa + correction * wa);
        }
        if let BodyRef::Particle(id) = c.b {
            state.set_position(id.index(), pb - correction * wb);
        }
    }
}
