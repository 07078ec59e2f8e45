//! Integration tests for billow-types.

use billow_types::constants::{DEFAULT_COLD_START_STEPS, DEFAULT_FIXED_DT, DEFAULT_MAX_SUBSTEPS};
use billow_types::{AnchorId, BillowError, ConstraintId, ParticleId};

// ─── ID Tests ──────────────────────────────────────────────────

#[test]
fn particle_id_index() {
    let id = ParticleId(42);
    assert_eq!(id.index(), 42);
}

#[test]
fn anchor_and_constraint_id_index() {
    assert_eq!(AnchorId(3).index(), 3);
    assert_eq!(ConstraintId(7).index(), 7);
}

#[test]
fn particle_ids_order_by_index() {
    let mut ids = vec![ParticleId(5), ParticleId(1), ParticleId(3)];
    ids.sort();
    assert_eq!(ids, vec![ParticleId(1), ParticleId(3), ParticleId(5)]);
}

#[test]
fn ids_are_serializable() {
    let id = ParticleId(100);
    let json = serde_json::to_string(&id).unwrap();
    let deserialized: ParticleId = serde_json::from_str(&json).unwrap();
    assert_eq!(id, deserialized);
}

// ─── Error Tests ──────────────────────────────────────────────

#[test]
fn error_display() {
    let err = BillowError::InvalidConfig("fixed_dt must be positive".into());
    assert!(err.to_string().contains("fixed_dt"));
}

#[test]
fn unknown_particle_display() {
    let err = BillowError::UnknownParticle(99);
    assert!(err.to_string().contains("99"));
}

#[test]
fn io_error_converts() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.toml");
    let err: BillowError = io.into();
    assert!(matches!(err, BillowError::Io(_)));
}

// ─── Constant Tests ───────────────────────────────────────────

#[test]
fn stepping_defaults_are_sane() {
    assert!((DEFAULT_FIXED_DT - 1.0 / 60.0).abs() < 1e-9);
    assert!(DEFAULT_COLD_START_STEPS <= DEFAULT_MAX_SUBSTEPS);
}
