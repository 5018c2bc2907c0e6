//! Timed particle spawner used by the scenario driver
//!
//! Every `interval` frames a free particle appears at a uniformly random
//! point of an axis-aligned region. Seeded, so runs are reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::SimError;
use crate::simulation::solver::Solver;
use crate::simulation::states::{NVec3, Particle, ParticleId};

pub struct Spawner {
    pub interval: usize, // frames between spawns
    pub radius: f64, // radius of spawned particles
    pub region_min: NVec3,
    pub region_max: NVec3,
    pub max_particles: Option<usize>, // stop once the solver holds this many
    frames_since: usize,
    rng: StdRng,
}

impl Spawner {
    pub fn new(
        interval: usize,
        radius: f64,
        region_min: NVec3,
        region_max: NVec3,
        max_particles: Option<usize>,
        seed: u64,
    ) -> Result<Self, SimError> {
        if interval == 0 {
            return Err(SimError::InvalidSpawner("interval must be at least 1 frame"));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SimError::InvalidRadius(radius));
        }
        let corners_finite = region_min.iter().chain(region_max.iter()).all(|c| c.is_finite());
        if !corners_finite {
            return Err(SimError::NonFinite("spawner region"));
        }
        if region_min.iter().zip(region_max.iter()).any(|(lo, hi)| lo > hi) {
            return Err(SimError::InvalidSpawner("region_min must not exceed region_max"));
        }

        Ok(Self {
            interval,
            radius,
            region_min,
            region_max,
            max_particles,
            frames_since: 0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Call once per frame before `Solver::update`.
    /// Returns the new particle's handle on frames that spawn.
    pub fn tick(&mut self, solver: &mut Solver) -> Result<Option<ParticleId>, SimError> {
        let mut spawned = None;

        let full = self.max_particles.is_some_and(|max| solver.particle_count() >= max);
        if self.frames_since >= self.interval && !full {
            let position = self.sample_position();
            let id = solver.add_object(Particle::new(position, self.radius))?;
            log::debug!("spawned particle {} at {:?}", id.index(), position.as_slice());
            spawned = Some(id);
            self.frames_since = 0;
        }

        self.frames_since += 1;
        Ok(spawned)
    }

    fn sample_position(&mut self) -> NVec3 {
        let span = self.region_max - self.region_min;
        let t = NVec3::new(self.rng.gen::<f64>(), self.rng.gen::<f64>(), self.rng.gen::<f64>());
        self.region_min + span.component_mul(&t)
    }
}
