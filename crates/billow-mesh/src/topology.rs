//! Constraint topology for the woven lattice.
//!
//! Built once from a [`Lattice`] and never mutated. Each edge is emitted
//! exactly once, from the lower-`x` (then lower-`y`) endpoint.

use serde::{Deserialize, Serialize};

use billow_types::ParticleId;

use crate::lattice::Lattice;

/// How densely the fabric is woven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weave {
    /// Right and below neighbours only (quad mesh).
    Sparse,
    /// Structural edges plus both diagonals (quad + shear mesh).
    Dense,
}

/// What an edge resists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Axis-aligned neighbour.
    Structural,
    /// Diagonal neighbour (dense weave only).
    Shear,
}

/// A single lattice edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatticeEdge {
    pub a: ParticleId,
    pub b: ParticleId,
    pub kind: EdgeKind,
}

/// Precomputed edge list for a lattice.
#[derive(Debug, Clone)]
pub struct ConstraintTopology {
    /// Weave the edges were generated for.
    pub weave: Weave,
    /// Unique edges.
    pub edges: Vec<LatticeEdge>,
}

impl ConstraintTopology {
    /// Build the edge list.
    ///
    /// For every cell origin `(x, y)` with `x < Nx, y < Ny`: edges to
    /// `(x, y+1)` and `(x+1, y)`; with [`Weave::Dense`] also to `(x+1, y+1)`
    /// and, when `y > 0`, to `(x+1, y-1)`. The last column only links
    /// downwards and the last row only links to the right.
    pub fn build(lattice: &Lattice, weave: Weave) -> Self {
        let nx = lattice.segments_x;
        let ny = lattice.segments_y;
        let mut edges = Vec::with_capacity(Self::expected_edge_count(lattice, weave));

        let mut push = |x1: usize, y1: usize, x2: usize, y2: usize, kind: EdgeKind| {
            edges.push(LatticeEdge {
                a: lattice.id(x1, y1),
                b: lattice.id(x2, y2),
                kind,
            });
        };

        for x in 0..=nx {
            for y in 0..=ny {
                if x < nx && y < ny {
                    push(x, y, x, y + 1, EdgeKind::Structural);
                    push(x, y, x + 1, y, EdgeKind::Structural);
                    if weave == Weave::Dense {
                        push(x, y, x + 1, y + 1, EdgeKind::Shear);
                        if y > 0 {
                            push(x, y, x + 1, y - 1, EdgeKind::Shear);
                        }
                    }
                } else if x == nx && y < ny {
                    push(x, y, x, y + 1, EdgeKind::Structural);
                } else if x < nx && y == ny {
                    push(x, y, x + 1, y, EdgeKind::Structural);
                }
            }
        }

        Self { weave, edges }
    }

    /// Edge count [`ConstraintTopology::build`] produces for `lattice`.
    pub fn expected_edge_count(lattice: &Lattice, weave: Weave) -> usize {
        let nx = lattice.segments_x;
        let ny = lattice.segments_y;
        let structural = nx * (ny + 1) + ny * (nx + 1);
        match weave {
            Weave::Sparse => structural,
            Weave::Dense => structural + nx * ny + nx * (ny - 1),
        }
    }

    /// Number of edges touching each particle, in id order.
    pub fn degree(&self, particle_count: usize) -> Vec<u32> {
        let mut degree = vec![0u32; particle_count];
        for e in &self.edges {
            degree[e.a.index()] += 1;
            degree[e.b.index()] += 1;
        }
        degree
    }

    /// Number of shear edges.
    pub fn shear_count(&self) -> usize {
        self.edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Shear)
            .count()
    }
}
