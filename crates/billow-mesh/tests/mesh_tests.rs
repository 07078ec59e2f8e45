//! Integration tests for billow-mesh.

use std::collections::HashSet;

use billow_mesh::generators::lattice_triangles;
use billow_mesh::topology::{ConstraintTopology, EdgeKind, Weave};
use billow_mesh::Lattice;
use billow_types::ParticleId;

fn lattice(n: usize) -> Lattice {
    Lattice::new(n, n, 10.0, 10.0).unwrap()
}

// ─── Lattice Tests ────────────────────────────────────────────

#[test]
fn lattice_counts() {
    let l = Lattice::new(4, 3, 8.0, 6.0).unwrap();
    assert_eq!(l.columns(), 5);
    assert_eq!(l.rows(), 4);
    assert_eq!(l.particle_count(), 20);
    assert!((l.spacing_x() - 2.0).abs() < 1e-6);
    assert!((l.spacing_y() - 2.0).abs() < 1e-6);
}

#[test]
fn lattice_rejects_degenerate() {
    assert!(Lattice::new(0, 4, 1.0, 1.0).is_err());
    assert!(Lattice::new(4, 4, 0.0, 1.0).is_err());
    assert!(Lattice::new(4, 4, 1.0, f32::NAN).is_err());
}

#[test]
fn lattice_rejects_more_particles_than_ids() {
    assert!(Lattice::new(100_000, 100_000, 10.0, 10.0).is_err());
    assert!(Lattice::new(usize::MAX, 1, 10.0, 10.0).is_err());
    // 65536 × 65536 particles is one past u32::MAX.
    assert!(Lattice::new(65_535, 65_535, 10.0, 10.0).is_err());
    assert!(Lattice::new(65_535, 65_534, 10.0, 10.0).is_ok());

    let huge = Lattice {
        segments_x: usize::MAX,
        segments_y: usize::MAX,
        width: 1.0,
        height: 1.0,
    };
    assert_eq!(huge.checked_particle_count(), None);
    assert_eq!(huge.particle_count(), usize::MAX);
}

#[test]
fn id_and_coords_round_trip() {
    let l = Lattice::new(4, 3, 1.0, 1.0).unwrap();
    for x in 0..l.columns() {
        for y in 0..l.rows() {
            let id = l.id(x, y);
            assert_eq!(l.coords(id), (x, y));
        }
    }
    assert_eq!(l.id(1, 0), ParticleId(4));
}

#[test]
fn checked_id_rejects_outside() {
    let l = lattice(2);
    assert!(l.checked_id(2, 2).is_ok());
    assert!(l.checked_id(3, 0).is_err());
    assert!(l.checked_id(0, 3).is_err());
}

#[test]
fn hanging_positions_are_centred_and_flat() {
    let l = lattice(2);
    let positions = l.hanging_positions(-2.0);
    assert_eq!(positions.len(), 9);
    assert!(positions.iter().all(|p| p.y == -2.0));

    let first = positions[l.id(0, 0).index()];
    let centre = positions[l.id(1, 1).index()];
    let last = positions[l.id(2, 2).index()];
    assert!((first.x + 5.0).abs() < 1e-6 && (first.z + 5.0).abs() < 1e-6);
    assert!(centre.x.abs() < 1e-6 && centre.z.abs() < 1e-6);
    assert!((last.x - 5.0).abs() < 1e-6 && (last.z - 5.0).abs() < 1e-6);
}

// ─── Topology Tests ───────────────────────────────────────────

#[test]
fn sparse_edge_count() {
    let l = lattice(3);
    let topo = ConstraintTopology::build(&l, Weave::Sparse);
    // 3 × 4 horizontal + 3 × 4 vertical
    assert_eq!(topo.edges.len(), 24);
    assert_eq!(topo.edges.len(), ConstraintTopology::expected_edge_count(&l, Weave::Sparse));
    assert_eq!(topo.shear_count(), 0);
}

#[test]
fn dense_edge_count() {
    let l = lattice(3);
    let topo = ConstraintTopology::build(&l, Weave::Dense);
    // 24 structural + 9 diagonal + 6 reverse diagonal
    assert_eq!(topo.edges.len(), 39);
    assert_eq!(topo.shear_count(), 15);
    assert_eq!(topo.edges.len(), ConstraintTopology::expected_edge_count(&l, Weave::Dense));
}

#[test]
fn no_duplicate_edges() {
    for weave in [Weave::Sparse, Weave::Dense] {
        let topo = ConstraintTopology::build(&lattice(5), weave);
        let mut seen = HashSet::new();
        for e in &topo.edges {
            assert_ne!(e.a, e.b);
            let key = if e.a < e.b { (e.a, e.b) } else { (e.b, e.a) };
            assert!(seen.insert(key), "duplicate edge {:?}", key);
        }
    }
}

#[test]
fn sparse_edges_join_axis_neighbours() {
    let l = lattice(4);
    let topo = ConstraintTopology::build(&l, Weave::Sparse);
    for e in &topo.edges {
        assert_eq!(e.kind, EdgeKind::Structural);
        let (ax, ay) = l.coords(e.a);
        let (bx, by) = l.coords(e.b);
        assert_eq!(ax.abs_diff(bx) + ay.abs_diff(by), 1);
    }
}

#[test]
fn sparse_interior_degree_is_four() {
    let l = lattice(4);
    let topo = ConstraintTopology::build(&l, Weave::Sparse);
    let degree = topo.degree(l.particle_count());
    assert_eq!(degree[l.id(2, 2).index()], 4);
    assert_eq!(degree[l.id(0, 0).index()], 2);
}

#[test]
fn every_particle_is_connected() {
    for weave in [Weave::Sparse, Weave::Dense] {
        let l = lattice(3);
        let topo = ConstraintTopology::build(&l, weave);
        assert!(topo.degree(l.particle_count()).iter().all(|&d| d > 0));
    }
}

// ─── Triangulation Tests ──────────────────────────────────────

#[test]
fn triangles_reference_valid_vertices() {
    let l = Lattice::new(3, 2, 1.0, 1.0).unwrap();
    let indices = lattice_triangles(&l);
    assert_eq!(indices.len(), 3 * 2 * 6);
    assert!(indices.iter().all(|&i| (i as usize) < l.particle_count()));
}

#[test]
fn lattice_serialization() {
    let l = lattice(4);
    let json = serde_json::to_string(&l).unwrap();
    let recovered: Lattice = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered, l);
}
