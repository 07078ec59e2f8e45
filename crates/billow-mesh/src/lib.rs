//! # billow-mesh
//!
//! Rectangular particle lattice and its fixed constraint topology.
//!
//! ## Key Types
//!
//! - [`Lattice`] — `(Nx+1) × (Ny+1)` grid dimensions, `(x, y)` ↔ id mapping
//!   and the hanging initial layout.
//! - [`ConstraintTopology`] — structural (+ optional shear) edges, built once.
//! - [`generators::lattice_triangles`] — index buffer for the renderer.

pub mod generators;
pub mod lattice;
pub mod topology;

pub use lattice::Lattice;
pub use topology::{ConstraintTopology, EdgeKind, Weave};
