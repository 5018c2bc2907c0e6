//! High-level runtime engine settings
//!
//! Selects how candidate collision pairs are found and how often the
//! spatial index is rebuilt during one `Solver::update`

use crate::configuration::config::{BroadPhaseConfig, RebuildConfig};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Engine {
    pub broad_phase: BroadPhaseConfig, // brute, octree or grid
    pub rebuild: RebuildConfig, // every sub-step or once per frame
}

impl Engine {
    pub fn new(broad_phase: BroadPhaseConfig, rebuild: RebuildConfig) -> Self {
        Self { broad_phase, rebuild }
    }

    /// All-pairs fallback, deterministic and index-free.
    pub fn brute_force() -> Self {
        Self::new(BroadPhaseConfig::BruteForce, RebuildConfig::SubStep)
    }

    /// True when the broad phase relies on the query radius.
    pub fn uses_index(&self) -> bool {
        !matches!(self.broad_phase, BroadPhaseConfig::BruteForce)
    }
}
