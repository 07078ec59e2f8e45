//! Render-side index generation.
//!
//! The physics core only exports positions; triangulation belongs to
//! the renderer. This helper produces the index buffer matching the
//! lattice's vertex order so headless exporters can ship a complete mesh.

use crate::lattice::Lattice;

/// Two triangles per lattice cell, wound consistently.
///
/// # Example
/// ```
/// use billow_mesh::{generators::lattice_triangles, Lattice};
/// let lattice = Lattice::new(2, 2, 1.0, 1.0).unwrap();
/// let indices = lattice_triangles(&lattice);
/// assert_eq!(indices.len(), 2 * 2 * 2 * 3); // 2×2 cells × 2 tris × 3
/// ```
pub fn lattice_triangles(lattice: &Lattice) -> Vec<u32> {
    let mut indices = Vec::with_capacity(lattice.segments_x * lattice.segments_y * 6);

    for x in 0..lattice.segments_x {
        for y in 0..lattice.segments_y {
            let a = lattice.id(x, y).0;
            let b = lattice.id(x, y + 1).0;
            let c = lattice.id(x + 1, y).0;
            let d = lattice.id(x + 1, y + 1).0;

            indices.extend_from_slice(&[a, b, c]);
            indices.extend_from_slice(&[c, b, d]);
        }
    }

    indices
}
