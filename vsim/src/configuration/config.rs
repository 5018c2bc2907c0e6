//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`SolverConfig`]    – time step, sub-steps, gravity, friction, query radius
//! - [`EngineConfig`]    – broad phase and spatial index rebuild policy
//! - [`ContainerConfig`] – the static boundary (sphere or cube)
//! - [`ParticleConfig`]  – initial state for each particle
//! - [`LinkConfig`]      – distance constraints between particles
//! - [`SpawnerConfig`]   – optional timed spawner
//! - [`ScenarioConfig`]  – top-level wrapper
//!
//! # YAML format
//!
//! ```yaml
//! solver:
//!   time_step: 0.0015
//!   sub_steps: 12
//!   gravity: [0.0, -1000.0, 0.0]
//!   friction: -100.0
//!   query_radius: 0.4
//!
//! engine:
//!   broad_phase: "octree"   # or "brute", "grid"
//!   rebuild: "sub_step"     # or "frame"
//!
//! container:
//!   shape: sphere           # or cuboid (with half_extent)
//!   center: [0.0, 0.0, 0.0]
//!   radius: 4.0
//!
//! particles:
//!   - x: [0.0, 1.0, 0.0]
//!     radius: 0.2
//!     fixed: true
//!   - x: [1.0, 1.0, 0.0]
//!     v: [0.0, 0.0, 5.0]
//!     radius: 0.2
//!
//! links:
//!   - a: 0
//!     b: 1                  # target defaults to the initial separation
//!
//! spawner:
//!   interval: 30
//!   radius: 0.2
//!   region_min: [0.0, 0.0, 0.0]
//!   region_max: [2.0, 0.0, 2.0]
//!
//! frames: 600
//! seed: 42
//! ```
//!
//! `Scenario::build_scenario` maps this onto the runtime types.

use serde::Deserialize;

use crate::error::SimError;
use crate::simulation::states::NVec3;

/// How candidate collision pairs are found.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub enum BroadPhaseConfig {
    #[serde(rename = "brute")] // every pair, no index; deterministic fallback
    BruteForce,

    #[default]
    #[serde(rename = "octree")] // fixed-radius pair query over an octree
    Octree,

    #[serde(rename = "grid")] // uniform hash grid, cell edge = query radius
    Grid,
}

/// When the spatial index is rebuilt.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub enum RebuildConfig {
    #[default]
    #[serde(rename = "sub_step")] // fresh pairs every sub-step
    SubStep,

    #[serde(rename = "frame")] // pairs from the first sub-step reused for the frame
    Frame,
}

/// Solver constants; every unset field falls back to `SolverParams::default()`.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SolverConfig {
    pub time_step: Option<f64>,
    pub sub_steps: Option<usize>,
    pub gravity: Option<Vec<f64>>,
    pub friction: Option<f64>,
    pub query_radius: Option<f64>,
    pub anchor_fixed: Option<bool>, // fixed particles ignore collisions and the container
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub broad_phase: BroadPhaseConfig,
    pub rebuild: RebuildConfig,
}

/// Container shape, tagged by `shape:`.
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum ContainerConfig {
    Sphere { center: Vec<f64>, radius: f64 },
    Cuboid { center: Vec<f64>, half_extent: f64 },
}

impl Default for ContainerConfig {
    fn default() -> Self {
        ContainerConfig::Sphere { center: vec![0.0, 0.0, 0.0], radius: 4.0 }
    }
}

/// Initial state of one particle
#[derive(Deserialize, Debug, Clone)]
pub struct ParticleConfig {
    pub x: Vec<f64>, // initial position
    #[serde(default)]
    pub v: Option<Vec<f64>>, // initial velocity in units per second
    pub radius: f64,
    #[serde(default)]
    pub fixed: bool, // anchor: never integrated
}

/// Link between two particles, by index into `particles`
#[derive(Deserialize, Debug, Clone)]
pub struct LinkConfig {
    pub a: usize,
    pub b: usize,
    #[serde(default)]
    pub target: Option<f64>, // rest length, defaults to the initial separation
}

#[derive(Deserialize, Debug, Clone)]
pub struct SpawnerConfig {
    pub interval: usize,
    pub radius: f64,
    pub region_min: Vec<f64>,
    pub region_max: Vec<f64>,
    #[serde(default)]
    pub max_particles: Option<usize>,
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub container: ContainerConfig,
    #[serde(default)]
    pub particles: Vec<ParticleConfig>,
    #[serde(default)]
    pub links: Vec<LinkConfig>,
    #[serde(default)]
    pub spawner: Option<SpawnerConfig>,
    #[serde(default = "default_frames")]
    pub frames: usize, // frames the driver runs
    #[serde(default)]
    pub seed: u64, // spawner seed
}

fn default_frames() -> usize {
    600
}

impl ScenarioConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}

/// Read a 3-component vector out of a YAML list.
pub fn vec3(field: &'static str, v: &[f64]) -> Result<NVec3, SimError> {
    match v {
        [x, y, z] => {
            let out = NVec3::new(*x, *y, *z);
            if out.iter().all(|c| c.is_finite()) {
                Ok(out)
            } else {
                Err(SimError::NonFinite(field))
            }
        }
        _ => Err(SimError::MalformedVector { field, len: v.len() }),
    }
}
