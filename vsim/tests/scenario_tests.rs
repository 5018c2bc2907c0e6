use std::path::PathBuf;

use vsim::{
    BroadPhaseConfig, Container, ContainerConfig, Diagnostics, Engine, ParticleId, RebuildConfig,
    Scenario, ScenarioConfig, SimError, Solver, SolverParams, Spawner, NVec3,
};

fn spawner(interval: usize, max_particles: Option<usize>, seed: u64) -> Spawner {
    Spawner::new(
        interval,
        0.2,
        NVec3::new(0.0, 0.0, 0.0),
        NVec3::new(2.0, 0.0, 2.0),
        max_particles,
        seed,
    )
    .unwrap()
}

fn empty_solver() -> Solver {
    Solver::new(SolverParams::default(), Engine::default(), Container::sphere(NVec3::zeros(), 4.0)).unwrap()
}

fn load(file_name: &str) -> ScenarioConfig {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let text = std::fs::read_to_string(&path).unwrap();
    ScenarioConfig::from_yaml_str(&text).unwrap()
}

// ==================================================================================
// Spawner tests
// ==================================================================================

#[test]
fn spawner_fires_every_interval() {
    let mut solver = empty_solver();
    let mut sp = spawner(30, None, 42);

    let mut fired = Vec::new();
    for frame in 0..91 {
        if let Some(id) = sp.tick(&mut solver).unwrap() {
            fired.push((frame, id));
        }
    }

    assert_eq!(fired, vec![(30, ParticleId(0)), (60, ParticleId(1)), (90, ParticleId(2))]);
    for p in solver.particles() {
        assert_eq!(p.radius, 0.2);
        assert_eq!(p.pos_curr.y, 0.0);
        assert!((0.0..=2.0).contains(&p.pos_curr.x));
        assert!((0.0..=2.0).contains(&p.pos_curr.z));
    }
}

#[test]
fn spawner_respects_cap() {
    let mut solver = empty_solver();
    let mut sp = spawner(1, Some(3), 1);

    for _ in 0..50 {
        sp.tick(&mut solver).unwrap();
    }

    assert_eq!(solver.particle_count(), 3);
}

#[test]
fn spawner_is_reproducible_per_seed() {
    let positions = |seed| {
        let mut solver = empty_solver();
        let mut sp = spawner(1, None, seed);
        for _ in 0..10 {
            sp.tick(&mut solver).unwrap();
        }
        solver.particles().iter().map(|p| p.pos_curr).collect::<Vec<_>>()
    };

    assert_eq!(positions(42), positions(42));
    assert_ne!(positions(42), positions(43));
}

#[test]
fn spawner_rejects_bad_settings() {
    let lo = NVec3::zeros();
    let hi = NVec3::new(1.0, 1.0, 1.0);

    assert!(matches!(Spawner::new(0, 0.2, lo, hi, None, 0), Err(SimError::InvalidSpawner(_))));
    assert!(matches!(Spawner::new(10, 0.0, lo, hi, None, 0), Err(SimError::InvalidRadius(_))));
    assert!(matches!(Spawner::new(10, 0.2, hi, lo, None, 0), Err(SimError::InvalidSpawner(_))));
}

// ==================================================================================
// Configuration tests
// ==================================================================================

#[test]
fn empty_yaml_uses_defaults() {
    let cfg = ScenarioConfig::from_yaml_str("{}").unwrap();

    assert_eq!(cfg.frames, 600);
    assert_eq!(cfg.engine.broad_phase, BroadPhaseConfig::Octree);
    assert_eq!(cfg.engine.rebuild, RebuildConfig::SubStep);
    assert!(matches!(cfg.container, ContainerConfig::Sphere { radius, .. } if radius == 4.0));

    let scenario = Scenario::build_scenario(cfg).unwrap();
    assert_eq!(scenario.solver.params(), &SolverParams::default());
    assert_eq!(scenario.solver.particle_count(), 0);
    assert!(scenario.spawner.is_none());
}

#[test]
fn yaml_scenario_builds_particles_and_links() {
    let yaml = r#"
solver:
  time_step: 0.0015
  sub_steps: 3
  gravity: [0.0, 0.0, 0.0]
  friction: 0.0
engine:
  broad_phase: "grid"
  rebuild: "frame"
container:
  shape: cuboid
  center: [0.0, 0.0, 0.0]
  half_extent: 3.0
particles:
  - { x: [0.0, 0.0, 0.0], radius: 0.2, fixed: true }
  - { x: [0.0, 1.5, 0.0], v: [10.0, 0.0, 0.0], radius: 0.2 }
  - { x: [1.0, 0.0, 0.0], radius: 0.1 }
links:
  - { a: 0, b: 1 }
  - { a: 1, b: 2, target: 0.5 }
  - { a: 1, b: 0 }
frames: 5
"#;
    let cfg = ScenarioConfig::from_yaml_str(yaml).unwrap();
    let scenario = Scenario::build_scenario(cfg).unwrap();
    let solver = &scenario.solver;

    assert_eq!(scenario.frames, 5);
    assert_eq!(solver.engine().broad_phase, BroadPhaseConfig::Grid);
    assert_eq!(solver.container(), &Container::cuboid(NVec3::zeros(), 3.0));
    assert_eq!(solver.particle_count(), 3);
    assert!(solver.particle(ParticleId(0)).unwrap().is_fixed());

    // Reversed duplicate is dropped; missing target means current distance
    assert_eq!(solver.link_count(), 2);
    assert!((solver.links()[0].target - 1.5).abs() < 1e-12);
    assert_eq!(solver.links()[1].target, 0.5);

    // 10 units/s over a 0.0005 sub-step
    let moving = solver.particle(ParticleId(1)).unwrap();
    assert!((moving.displacement().x - 0.005).abs() < 1e-12);
}

#[test]
fn malformed_vectors_are_rejected() {
    let cfg = ScenarioConfig::from_yaml_str("solver:\n  gravity: [0.0, -1.0]\n").unwrap();
    assert_eq!(
        Scenario::build_scenario(cfg).err(),
        Some(SimError::MalformedVector { field: "solver.gravity", len: 2 })
    );

    let cfg = ScenarioConfig::from_yaml_str("particles:\n  - { x: [1.0], radius: 0.2 }\n").unwrap();
    assert!(matches!(
        Scenario::build_scenario(cfg),
        Err(SimError::MalformedVector { field: "particles.x", len: 1 })
    ));
}

#[test]
fn bad_link_indices_are_rejected() {
    let yaml = "particles:\n  - { x: [0.0, 0.0, 0.0], radius: 0.2 }\nlinks:\n  - { a: 0, b: 3 }\n";
    let cfg = ScenarioConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(
        Scenario::build_scenario(cfg).err(),
        Some(SimError::ParticleOutOfBounds { index: 3, count: 1 })
    );
}

#[test]
fn invalid_solver_settings_surface_as_errors() {
    let cfg = ScenarioConfig::from_yaml_str("solver:\n  sub_steps: 0\n").unwrap();
    assert_eq!(Scenario::build_scenario(cfg).err(), Some(SimError::InvalidSubSteps(0)));
}

#[test]
fn unknown_broad_phase_fails_to_parse() {
    assert!(ScenarioConfig::from_yaml_str("engine:\n  broad_phase: \"kdtree\"\n").is_err());
}

// ==================================================================================
// Bundled scenario tests
// ==================================================================================

#[test]
fn bundled_scenarios_run() {
    for file_name in ["container.yaml", "chain.yaml", "cube.yaml"] {
        let mut cfg = load(file_name);
        cfg.frames = 90;
        let mut scenario = Scenario::build_scenario(cfg).unwrap();
        scenario.run().unwrap();

        let d = Diagnostics::measure(&scenario.solver);
        assert!(!d.non_finite, "{file_name}: non-finite position");
        assert_eq!(scenario.solver.frame(), 90);
    }
}

#[test]
fn container_scenario_spawns_on_schedule() {
    let mut cfg = load("container.yaml");
    cfg.frames = 91;
    let mut scenario = Scenario::build_scenario(cfg).unwrap();

    scenario.run().unwrap();

    assert_eq!(scenario.solver.particle_count(), 3);
    let d = Diagnostics::measure(&scenario.solver);
    assert!(d.max_container_violation < 0.05);
}

#[test]
fn chain_scenario_keeps_anchor() {
    let mut cfg = load("chain.yaml");
    cfg.frames = 200;
    let mut scenario = Scenario::build_scenario(cfg).unwrap();
    let anchor = scenario.solver.particle(ParticleId(0)).unwrap().pos_curr;

    let mut lowest = f64::INFINITY;
    for _ in 0..scenario.frames {
        scenario.step().unwrap();
        assert_eq!(scenario.solver.particle(ParticleId(0)).unwrap().pos_curr, anchor);
        lowest = lowest.min(scenario.solver.particle(ParticleId(7)).unwrap().pos_curr.y);
    }

    // The free end swung well below the anchor
    assert!(lowest < anchor.y - 1.0, "lowest {lowest}");
}
