pub mod simulation;
pub mod configuration;
pub mod benchmark;
pub mod error;

pub use simulation::states::{Particle, Role, ParticleId, Link, NVec3};
pub use simulation::params::SolverParams;
pub use simulation::engine::Engine;
pub use simulation::forces::{Acceleration, ForceSet, UniformGravity, VelocityFriction, RadialPush};
pub use simulation::integrator::verlet_integrator;
pub use simulation::octree::Octree;
pub use simulation::grid::UniformGrid;
pub use simulation::constraints::Container;
pub use simulation::solver::Solver;
pub use simulation::spawner::Spawner;
pub use simulation::scenario::Scenario;
pub use simulation::diagnostics::Diagnostics;

pub use configuration::config::{
    BroadPhaseConfig, RebuildConfig, SolverConfig, EngineConfig, ContainerConfig,
    ParticleConfig, LinkConfig, SpawnerConfig, ScenarioConfig,
};

pub use error::SimError;

pub use benchmark::benchmark::{bench_broad_phase, bench_broad_phase_curve};
