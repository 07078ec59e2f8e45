//! Integration tests for billow-solver.

use billow_math::Vec3;
use billow_mesh::topology::{ConstraintTopology, Weave};
use billow_mesh::Lattice;
use billow_solver::constraint::ConstraintKind;
use billow_solver::{
    substeps_for, AnchorSet, BodyRef, ClothWorld, ConstraintSet, DistanceConstraint,
    FixedStepper, GravityRamp, NetworkSpec, NoForce, PositionBasedSolver, SimulationState,
    SolverConfig, SolverStrategy, StepInput, StepperMode, UniformForce,
};
use billow_types::{AnchorId, BillowError, ConstraintId, ParticleId};

fn spec(n: usize, size: f32, weave: Weave, start_height: f32) -> NetworkSpec {
    NetworkSpec {
        lattice: Lattice::new(n, n, size, size).unwrap(),
        weave,
        start_height,
        total_mass: 1.0,
        pinned: Vec::new(),
    }
}

fn config_with_gravity(gy: f32) -> SolverConfig {
    SolverConfig {
        gravity: [0.0, gy, 0.0],
        ..Default::default()
    }
}

// ─── SimulationState Tests ────────────────────────────────────

#[test]
fn state_from_lattice() {
    let lattice = Lattice::new(4, 2, 4.0, 2.0).unwrap();
    let state = SimulationState::from_lattice(&lattice, -2.0, 3.0).unwrap();

    assert_eq!(state.particle_count, 15);
    assert!(state.vel_x.iter().all(|&v| v == 0.0)); // Starts at rest
    assert!(state.pos_y.iter().all(|&y| y == -2.0));
    // total / segments_x * segments_y = 3 / 4 * 2
    assert!(state.mass.iter().all(|&m| (m - 1.5).abs() < 1e-6));
}

#[test]
fn state_rejects_non_positive_mass() {
    let lattice = Lattice::new(2, 2, 1.0, 1.0).unwrap();
    assert!(SimulationState::from_lattice(&lattice, 0.0, 0.0).is_err());
    assert!(SimulationState::from_lattice(&lattice, 0.0, -1.0).is_err());
}

#[test]
fn apply_force_accumulates() {
    let lattice = Lattice::new(2, 2, 1.0, 1.0).unwrap();
    let mut state = SimulationState::from_lattice(&lattice, 0.0, 1.0).unwrap();

    assert!(state.apply_force(ParticleId(4), Vec3::new(1.0, 0.0, 0.0)).unwrap());
    assert!(state.apply_force(ParticleId(4), Vec3::new(0.5, 2.0, 0.0)).unwrap());
    assert_eq!(state.force(4), Vec3::new(1.5, 2.0, 0.0));

    state.clear_forces();
    assert_eq!(state.force(4), Vec3::ZERO);
}

#[test]
fn apply_force_is_noop_on_pinned() {
    let lattice = Lattice::new(2, 2, 1.0, 1.0).unwrap();
    let mut state = SimulationState::from_lattice(&lattice, 0.0, 1.0).unwrap();
    state.pin(ParticleId(0)).unwrap();

    assert!(!state.apply_force(ParticleId(0), Vec3::ONE).unwrap());
    assert_eq!(state.force(0), Vec3::ZERO);
}

#[test]
fn apply_force_rejects_unknown_particle() {
    let lattice = Lattice::new(2, 2, 1.0, 1.0).unwrap();
    let mut state = SimulationState::from_lattice(&lattice, 0.0, 1.0).unwrap();
    let err = state.apply_force(ParticleId(9), Vec3::ONE).unwrap_err();
    assert!(matches!(err, BillowError::UnknownParticle(9)));
}

#[test]
fn integrate_applies_force_and_damping() {
    let mut state = SimulationState::from_positions(&[Vec3::ZERO], 2.0).unwrap();
    state.apply_force(ParticleId(0), Vec3::new(4.0, 0.0, 0.0)).unwrap();

    state.integrate(0.5, 0.0);
    // v = f/m · dt = 1.0, p = v · dt = 0.5
    assert!((state.vel_x[0] - 1.0).abs() < 1e-6);
    assert!((state.pos_x[0] - 0.5).abs() < 1e-6);

    state.clear_forces();
    state.integrate(1.0, 0.5);
    // v *= (1 - 0.5)^1
    assert!((state.vel_x[0] - 0.5).abs() < 1e-6);
}

#[test]
fn velocity_update_from_positions() {
    let mut state = SimulationState::from_positions(&[Vec3::ZERO, Vec3::X], 1.0).unwrap();
    state.save_previous();
    state.pos_x[0] += 0.5;
    let dt = 1.0 / 60.0;
    state.update_velocities(dt);

    assert!((state.vel_x[0] - 0.5 / dt).abs() < 1e-3);
    assert_eq!(state.vel_y[0], 0.0);
    assert_eq!(state.vel_x[1], 0.0);
}

#[test]
fn kinetic_energy() {
    let mut state = SimulationState::from_positions(&[Vec3::ZERO, Vec3::X], 1.0).unwrap();
    state.vel_x[0] = 1.0;
    // KE = 0.5 * 1.0 * 1.0²
    assert!((state.kinetic_energy() - 0.5).abs() < 1e-6);

    state.pin(ParticleId(1)).unwrap();
    state.vel_x[1] = 100.0;
    assert!((state.kinetic_energy() - 0.5).abs() < 1e-6);
}

#[test]
fn ground_projection() {
    let mut state = SimulationState::from_positions(&[Vec3::new(0.0, -5.0, 0.0)], 1.0).unwrap();
    state.ground_height = Some(-3.0);
    state.vel_y[0] = -2.0;
    state.vel_x[0] = 1.0;

    assert_eq!(state.enforce_ground(), 1);
    assert!(state.pos_y[0] >= -3.0);
    state.enforce_ground_velocities();
    assert_eq!(state.vel_y[0], 0.0);
    assert!((state.vel_x[0] - 0.5).abs() < 1e-6);
}

// ─── Constraint Tests ─────────────────────────────────────────

#[test]
fn constraints_capture_initial_rest_lengths() {
    let lattice = Lattice::new(3, 3, 3.0, 3.0).unwrap();
    let state = SimulationState::from_lattice(&lattice, 0.0, 1.0).unwrap();
    let topo = ConstraintTopology::build(&lattice, Weave::Dense);
    let constraints = ConstraintSet::from_topology(&topo, &state);

    assert_eq!(constraints.len(), topo.edges.len());
    for c in constraints.active() {
        let expected = match c.kind {
            ConstraintKind::Structural => 1.0,
            ConstraintKind::Shear => std::f32::consts::SQRT_2,
            ConstraintKind::Tether => unreachable!(),
        };
        assert!((c.rest_length() - expected).abs() < 1e-5);
    }
    assert!(constraints.max_error(&state, &AnchorSet::empty()) < 1e-5);
}

#[test]
fn relaxation_restores_rest_lengths() {
    let lattice = Lattice::new(4, 4, 4.0, 4.0).unwrap();
    let mut state = SimulationState::from_lattice(&lattice, 0.0, 1.0).unwrap();
    let topo = ConstraintTopology::build(&lattice, Weave::Sparse);
    let constraints = ConstraintSet::from_topology(&topo, &state);

    for i in 0..state.particle_count {
        state.pos_x[i] += 0.04 * ((i * 3 % 4) as f32 - 1.5);
        state.pos_y[i] += 0.05 * ((i * 7 % 5) as f32 - 2.0);
    }
    assert!(constraints.max_error(&state, &AnchorSet::empty()) > 0.01);

    let err = PositionBasedSolver::relax(&mut state, &constraints, &AnchorSet::empty(), 1000);
    assert!(err < 1e-3, "residual {err}");
}

#[test]
fn projection_skips_coincident_particles() {
    let mut state = SimulationState::from_positions(&[Vec3::ONE, Vec3::ONE], 1.0).unwrap();
    let mut constraints = ConstraintSet::new();
    constraints
        .push(
            DistanceConstraint::new(
                BodyRef::Particle(ParticleId(0)),
                BodyRef::Particle(ParticleId(1)),
                1.0,
                ConstraintKind::Structural,
            ),
            &state,
            &AnchorSet::empty(),
        )
        .unwrap();

    PositionBasedSolver::relax(&mut state, &constraints, &AnchorSet::empty(), 10);
    assert!(state.position(0).is_finite());
    assert!(state.position(1).is_finite());
}

#[test]
fn deactivated_constraint_is_ignored() {
    let mut state =
        SimulationState::from_positions(&[Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0)], 1.0).unwrap();
    let mut constraints = ConstraintSet::new();
    let id = constraints
        .push(
            DistanceConstraint::new(
                BodyRef::Particle(ParticleId(0)),
                BodyRef::Particle(ParticleId(1)),
                1.0,
                ConstraintKind::Structural,
            ),
            &state,
            &AnchorSet::empty(),
        )
        .unwrap();
    assert!(constraints.deactivate(id));
    assert!(!constraints.deactivate(ConstraintId(5)));
    assert_eq!(constraints.len(), 1);
    assert!(!constraints.get(id).unwrap().active);

    PositionBasedSolver::relax(&mut state, &constraints, &AnchorSet::empty(), 10);
    assert_eq!(state.position(1), Vec3::new(3.0, 0.0, 0.0));
}

#[test]
fn push_rejects_unknown_participants() {
    let state =
        SimulationState::from_positions(&[Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)], 1.0).unwrap();
    let anchors = AnchorSet::build(&[Vec3::ZERO], &[ParticleId(0)], 0.0, 2).unwrap();
    let mut constraints = ConstraintSet::new();

    let stray_particle = DistanceConstraint::new(
        BodyRef::Particle(ParticleId(0)),
        BodyRef::Particle(ParticleId(2)),
        1.0,
        ConstraintKind::Structural,
    );
    assert!(matches!(
        constraints.push(stray_particle, &state, &anchors),
        Err(BillowError::UnknownParticle(2))
    ));

    let stray_anchor = DistanceConstraint::new(
        BodyRef::Particle(ParticleId(1)),
        BodyRef::Anchor(AnchorId(1)),
        0.0,
        ConstraintKind::Tether,
    );
    assert!(matches!(
        constraints.push(stray_anchor, &state, &anchors),
        Err(BillowError::UnknownAnchor(1))
    ));
    assert!(constraints.is_empty());

    let tether = DistanceConstraint::new(
        BodyRef::Particle(ParticleId(1)),
        BodyRef::Anchor(AnchorId(0)),
        0.0,
        ConstraintKind::Tether,
    );
    assert_eq!(constraints.push(tether, &state, &anchors).unwrap(), ConstraintId(0));
}

// ─── Anchor Tests ─────────────────────────────────────────────

#[test]
fn anchor_build_validates() {
    let positions = [Vec3::ZERO, Vec3::ONE];
    assert!(AnchorSet::build(&positions, &[ParticleId(0)], 0.0, 9).is_err());
    assert!(AnchorSet::build(&positions, &[ParticleId(0), ParticleId(9)], 0.0, 9).is_err());
    assert!(AnchorSet::build(&positions, &[ParticleId(0), ParticleId(1)], -1.0, 9).is_err());

    let anchors = AnchorSet::build(&positions, &[ParticleId(0), ParticleId(8)], 2.0, 9).unwrap();
    assert_eq!(anchors.len(), 2);
    assert_eq!(anchors.tethers()[1].particle, ParticleId(8));
    assert_eq!(anchors.tethers()[1].length, 2.0);
}

#[test]
fn tether_pulls_particle_to_anchor_only() {
    let mut state = SimulationState::from_positions(&[Vec3::new(2.0, 0.0, 0.0)], 1.0).unwrap();
    let anchors = AnchorSet::build(&[Vec3::ZERO], &[ParticleId(0)], 0.5, 1).unwrap();
    let mut constraints = ConstraintSet::new();
    constraints.add_tethers(&anchors);

    PositionBasedSolver::relax(&mut state, &constraints, &anchors, 1);
    assert!((state.position(0).length() - 0.5).abs() < 1e-5);
    assert_eq!(anchors.positions()[0], Vec3::ZERO);
}

#[test]
fn anchors_never_move() {
    let s = spec(4, 4.0, Weave::Dense, 0.0);
    let lattice = s.lattice;
    let positions = vec![
        Vec3::new(-1.0, 2.0, -1.0),
        Vec3::new(1.0, 2.0, -1.0),
        Vec3::new(-1.0, 2.0, 1.0),
        Vec3::new(1.0, 2.0, 1.0),
    ];
    let tethered = [lattice.id(1, 1), lattice.id(3, 1), lattice.id(1, 3), lattice.id(3, 3)];
    let anchors = AnchorSet::build(&positions, &tethered, 2.0, lattice.particle_count()).unwrap();
    let mut world = ClothWorld::build(&s, anchors, &config_with_gravity(-9.81)).unwrap();

    let wind = UniformForce(Vec3::new(50.0, 30.0, -20.0));
    world.advance(240, &wind).unwrap();

    assert_eq!(world.anchors().positions(), positions.as_slice());
}

// ─── World Tests ──────────────────────────────────────────────

#[test]
fn tethered_particle_converges_to_anchor() {
    let s = NetworkSpec {
        lattice: Lattice::new(2, 2, 2.0, 2.0).unwrap(),
        weave: Weave::Sparse,
        start_height: 5.0,
        total_mass: 1.0,
        pinned: Vec::new(),
    };
    let centre = s.lattice.id(1, 1);
    let anchor = Vec3::new(0.0, 5.0, 0.0);
    let anchors = AnchorSet::build(&[anchor], &[centre], 0.0, s.lattice.particle_count()).unwrap();
    let mut world = ClothWorld::build(&s, anchors, &config_with_gravity(-1.0)).unwrap();

    world.advance(600, &NoForce).unwrap();

    let held = world.particle_position(1, 1).unwrap();
    assert!(held.distance(anchor) < 1e-3, "centre at {held}");

    let corner = world.particle_position(0, 0).unwrap();
    assert!(corner.y < 4.5, "corner should hang below the anchor: {corner}");
    assert!(corner.distance(anchor) > 0.5);
}

#[test]
fn topology_and_mass_never_change() {
    let s = spec(3, 3.0, Weave::Dense, 0.0);
    let mut world = ClothWorld::build(&s, AnchorSet::empty(), &config_with_gravity(-9.81)).unwrap();

    let count = world.state().particle_count;
    let masses = world.state().mass.clone();
    let constraint_count = world.constraints().len();
    let rest: Vec<f32> = world.constraints().active().map(|c| c.rest_length()).collect();

    world.advance(120, &UniformForce(Vec3::new(0.0, 3.0, 1.0))).unwrap();

    assert_eq!(world.state().particle_count, count);
    assert_eq!(world.state().mass, masses);
    assert_eq!(world.constraints().len(), constraint_count);
    let rest_after: Vec<f32> = world.constraints().active().map(|c| c.rest_length()).collect();
    assert_eq!(rest, rest_after);
    assert_eq!(world.steps_taken(), 120);
}

#[test]
fn cloth_at_rest_stays_at_rest() {
    let s = spec(3, 3.0, Weave::Sparse, 1.0);
    let mut world = ClothWorld::build(&s, AnchorSet::empty(), &config_with_gravity(0.0)).unwrap();
    let before = world.state().pos_y.clone();

    world.advance(30, &NoForce).unwrap();

    assert_eq!(world.state().pos_y, before);
    assert!(world.max_constraint_error() < 1e-6);
    assert_eq!(world.state().kinetic_energy(), 0.0);
}

#[test]
fn pinned_particle_stays_put() {
    let mut s = spec(2, 2.0, Weave::Sparse, 0.0);
    let corner = s.lattice.id(0, 0);
    s.pinned.push(corner);
    let mut world = ClothWorld::build(&s, AnchorSet::empty(), &config_with_gravity(-9.81)).unwrap();
    let start = world.state().position(corner.index());

    world.advance(60, &NoForce).unwrap();

    assert_eq!(world.state().position(corner.index()), start);
    assert!(world.particle_position(2, 2).unwrap().y < start.y);
}

#[test]
fn external_force_lasts_one_step() {
    let s = spec(1, 1.0, Weave::Sparse, 0.0);
    let mut world = ClothWorld::build(&s, AnchorSet::empty(), &config_with_gravity(0.0)).unwrap();
    for i in 0..4 {
        assert!(world.apply_force(ParticleId(i), Vec3::new(0.0, 60.0, 0.0)).unwrap());
    }
    world.step(&NoForce).unwrap();
    assert!(world.state().force_y.iter().all(|&f| f == 0.0));
    let risen = world.state().pos_y[0];
    assert!(risen > 0.0);
}

#[test]
fn force_field_applies_on_every_substep() {
    let s = spec(1, 1.0, Weave::Sparse, 0.0);
    let config = config_with_gravity(0.0);
    let push = UniformForce(Vec3::new(3.0, 0.0, 0.0));
    let steps = 6;

    let mut batched = ClothWorld::build(&s, AnchorSet::empty(), &config).unwrap();
    batched.advance(steps, &push).unwrap();

    let mut stepped = ClothWorld::build(&s, AnchorSet::empty(), &config).unwrap();
    for _ in 0..steps {
        stepped.step(&push).unwrap();
    }

    let mut pushed_once = ClothWorld::build(&s, AnchorSet::empty(), &config).unwrap();
    pushed_once.step(&push).unwrap();
    pushed_once.advance(steps - 1, &NoForce).unwrap();

    let start = s.lattice.hanging_positions(0.0)[0];
    let batched_dx = batched.state().position(0).x - start.x;
    assert_eq!(batched.state().pos_x, stepped.state().pos_x);
    assert_eq!(batched.steps_taken(), u64::from(steps));

    let once_dx = pushed_once.state().position(0).x - start.x;
    assert!(once_dx > 0.0);
    assert!(batched_dx > 2.0 * once_dx, "batched {batched_dx} vs once {once_dx}");
}

#[test]
fn ground_plane_holds_cloth() {
    let s = spec(4, 4.0, Weave::Sparse, -2.0);
    let config = SolverConfig {
        ground_height: Some(-3.0),
        ..config_with_gravity(-9.81)
    };
    let mut world = ClothWorld::build(&s, AnchorSet::empty(), &config).unwrap();
    world.advance(300, &NoForce).unwrap();

    assert!(world.state().pos_y.iter().all(|&y| y >= -3.0));
}

#[test]
fn gravity_can_change_between_steps() {
    let s = spec(1, 1.0, Weave::Sparse, 0.0);
    let mut world = ClothWorld::build(&s, AnchorSet::empty(), &config_with_gravity(2.0)).unwrap();
    world.advance(10, &NoForce).unwrap();
    assert!(world.state().pos_y[0] > 0.0);

    world.set_gravity_y(-50.0);
    assert_eq!(world.gravity(), Vec3::new(0.0, -50.0, 0.0));
    world.advance(30, &NoForce).unwrap();
    assert!(world.state().pos_y[0] < 0.0);
}

#[test]
fn uninitialized_solver_errors() {
    let mut solver = PositionBasedSolver::new();
    let mut state = SimulationState::from_positions(&[Vec3::ZERO], 1.0).unwrap();
    let constraints = ConstraintSet::new();
    let anchors = AnchorSet::empty();
    let input = StepInput {
        constraints: &constraints,
        anchors: &anchors,
        forces: &NoForce,
        gravity: Vec3::ZERO,
        dt: 1.0 / 60.0,
    };
    assert!(solver.step(&mut state, &input).is_err());
    assert_eq!(solver.name(), "position_based");
}

// ─── Stepper Tests ────────────────────────────────────────────

#[test]
fn cold_start_runs_fixed_batch() {
    let mut stepper = FixedStepper::new(1.0 / 60.0, 2, 8);
    assert!(!stepper.is_warm());

    let plan = stepper.plan(123.4);
    assert_eq!(plan.mode, StepperMode::Cold);
    assert_eq!(plan.steps, 2);
    assert!(stepper.is_warm());
    assert_eq!(stepper.last_call(), Some(123.4));
}

#[test]
fn warm_steps_follow_elapsed_time() {
    let mut stepper = FixedStepper::new(1.0 / 60.0, 2, 8);
    stepper.plan(10.0);

    let plan = stepper.plan(10.05);
    assert_eq!(plan.mode, StepperMode::Warm);
    assert_eq!(plan.steps, 3);
    assert!(!plan.was_capped());

    let fixed = stepper.fixed_dt();
    let plan = stepper.plan(10.05 + fixed);
    assert_eq!(plan.steps, 1);
}

#[test]
fn catch_up_is_capped() {
    let mut stepper = FixedStepper::new(1.0 / 60.0, 2, 8);
    stepper.plan(0.5);
    let plan = stepper.plan(10.5);

    assert_eq!(plan.steps, 8);
    assert!(plan.requested >= 600);
    assert!(plan.was_capped());
    assert!((plan.dropped - (10.0 - 8.0 * stepper.fixed_dt())).abs() < 1e-6);
}

#[test]
fn clock_going_backwards_runs_nothing() {
    let mut stepper = FixedStepper::new(1.0 / 60.0, 2, 8);
    stepper.plan(5.0);
    assert_eq!(stepper.plan(4.0).steps, 0);
}

#[test]
fn step_count_is_monotone() {
    let fixed = 1.0 / 60.0;
    let mut previous = 0;
    for k in 0..2000 {
        let dt = k as f64 * 0.0007;
        let steps = substeps_for(dt, fixed);
        assert!(steps >= previous, "dt={dt}: {steps} < {previous}");
        previous = steps;
    }
    assert_eq!(substeps_for(0.0, fixed), 0);
    assert_eq!(substeps_for(f64::NAN, fixed), 0);
    assert_eq!(substeps_for(1.0, 0.0), 0);
}

#[test]
fn stepper_reset_returns_to_cold() {
    let mut stepper = FixedStepper::from_config(&SolverConfig::default());
    stepper.plan(1.0);
    stepper.reset();
    assert_eq!(stepper.plan(2.0).mode, StepperMode::Cold);
}

// ─── Gravity Ramp Tests ───────────────────────────────────────

#[test]
fn ramp_interpolates_then_holds() {
    let ramp = GravityRamp::new(2.0, -5.0, 2000.0);
    assert_eq!(ramp.value_at(0.0), 2.0);
    assert!((ramp.value_at(1.0) + 1.5).abs() < 1e-6);
    assert_eq!(ramp.value_at(2.0), -5.0);
    assert_eq!(ramp.value_at(60.0), -5.0);
}

#[test]
fn ramp_starts_on_first_update() {
    let mut ramp = GravityRamp::new(2.0, -5.0, 2000.0);
    assert!(ramp.started_at().is_none());
    assert_eq!(ramp.update(100.0), 2.0);
    assert!((ramp.update(101.0) + 1.5).abs() < 1e-6);
    assert!(!ramp.is_settled(101.0));
    assert_eq!(ramp.update(102.5), -5.0);
    assert!(ramp.is_settled(102.5));
}

#[test]
fn zero_length_ramp_is_target() {
    let ramp = GravityRamp::new(2.0, -5.0, 0.0);
    assert_eq!(ramp.value_at(0.0), -5.0);
}

// ─── SolverConfig Tests ───────────────────────────────────────

#[test]
fn config_default() {
    let config = SolverConfig::default();
    assert_eq!(config.iterations, 10);
    assert_eq!(config.cold_start_steps, 2);
    assert!((config.fixed_dt - 1.0 / 60.0).abs() < 1e-9);
    assert!(config.validate().is_ok());
}

#[test]
fn config_validation_rejects_bad_values() {
    let bad = [
        SolverConfig { iterations: 0, ..Default::default() },
        SolverConfig { fixed_dt: 0.0, ..Default::default() },
        SolverConfig { max_substeps: 0, ..Default::default() },
        SolverConfig { cold_start_steps: 20, ..Default::default() },
        SolverConfig { linear_damping: 1.5, ..Default::default() },
        SolverConfig { gravity: [0.0, f32::NAN, 0.0], ..Default::default() },
    ];
    for config in bad {
        assert!(config.validate().is_err(), "{config:?} should be rejected");
    }
}

#[test]
fn config_serialization() {
    let config = SolverConfig {
        ground_height: Some(-3.0),
        ..Default::default()
    };
    let toml_str = toml::to_string(&config).unwrap();
    let recovered: SolverConfig = toml::from_str(&toml_str).unwrap();
    assert_eq!(recovered, config);
}
