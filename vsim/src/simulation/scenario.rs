//! Build a runnable scenario from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a `Scenario`:
//! - a `Solver` with the configured params, engine and container
//! - every configured particle and link already added
//! - an optional `Spawner`
//!
//! `Scenario::step` is what an external render loop calls once per frame.

use crate::configuration::config::{vec3, ContainerConfig, ParticleConfig, ScenarioConfig};
use crate::error::SimError;
use crate::simulation::constraints::Container;
use crate::simulation::engine::Engine;
use crate::simulation::params::SolverParams;
use crate::simulation::solver::Solver;
use crate::simulation::spawner::Spawner;
use crate::simulation::states::{Particle, ParticleId};

pub struct Scenario {
    pub solver: Solver,
    pub spawner: Option<Spawner>,
    pub frames: usize, // frames `run` advances
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, SimError> {
        // Params: unset fields keep the defaults
        let s_cfg = cfg.solver;
        let defaults = SolverParams::default();
        let params = SolverParams {
            time_step: s_cfg.time_step.unwrap_or(defaults.time_step),
            sub_steps: s_cfg.sub_steps.unwrap_or(defaults.sub_steps),
            gravity: match &s_cfg.gravity {
                Some(g) => vec3("solver.gravity", g)?,
                None => defaults.gravity,
            },
            friction: s_cfg.friction.unwrap_or(defaults.friction),
            query_radius: s_cfg.query_radius.unwrap_or(defaults.query_radius),
            anchor_fixed: s_cfg.anchor_fixed.unwrap_or(defaults.anchor_fixed),
        };

        let engine = Engine::new(cfg.engine.broad_phase, cfg.engine.rebuild);

        let container = match cfg.container {
            ContainerConfig::Sphere { center, radius } => Container::sphere(vec3("container.center", &center)?, radius),
            ContainerConfig::Cuboid { center, half_extent } => {
                Container::cuboid(vec3("container.center", &center)?, half_extent)
            }
        };

        let sub_dt = params.sub_dt();
        let mut solver = Solver::new(params, engine, container)?;

        // Particles: config index i becomes ParticleId(i)
        let mut ids: Vec<ParticleId> = Vec::with_capacity(cfg.particles.len());
        for pc in &cfg.particles {
            ids.push(solver.add_object(particle_from_config(pc, sub_dt)?)?);
        }

        for lc in &cfg.links {
            let lookup = |i: usize| {
                ids.get(i).copied().ok_or(SimError::ParticleOutOfBounds { index: i, count: ids.len() })
            };
            let (a, b) = (lookup(lc.a)?, lookup(lc.b)?);
            let target = match lc.target {
                Some(t) => t,
                None => match (solver.particle(a), solver.particle(b)) {
                    (Some(pa), Some(pb)) => (pa.pos_curr - pb.pos_curr).norm(),
                    _ => return Err(SimError::ParticleOutOfBounds { index: lc.a.max(lc.b), count: ids.len() }),
                },
            };
            solver.add_link(target, a, b)?;
        }

        let spawner = match cfg.spawner {
            Some(sc) => Some(Spawner::new(
                sc.interval,
                sc.radius,
                vec3("spawner.region_min", &sc.region_min)?,
                vec3("spawner.region_max", &sc.region_max)?,
                sc.max_particles,
                cfg.seed,
            )?),
            None => None,
        };

        log::info!(
            "scenario: {} particles, {} links, container {:?}, broad phase {:?}, spawner {}",
            solver.particle_count(),
            solver.link_count(),
            solver.container(),
            solver.engine().broad_phase,
            if spawner.is_some() { "on" } else { "off" },
        );

        Ok(Self {
            solver,
            spawner,
            frames: cfg.frames,
        })
    }

    /// Spawn tick (if any) followed by one solver frame.
    pub fn step(&mut self) -> Result<(), SimError> {
        if let Some(spawner) = self.spawner.as_mut() {
            spawner.tick(&mut self.solver)?;
        }
        self.solver.update();
        Ok(())
    }

    /// Run the configured number of frames.
    pub fn run(&mut self) -> Result<(), SimError> {
        for _ in 0..self.frames {
            self.step()?;
        }
        Ok(())
    }
}

fn particle_from_config(pc: &ParticleConfig, sub_dt: f64) -> Result<Particle, SimError> {
    let x = vec3("particles.x", &pc.x)?;
    let mut particle = if pc.fixed {
        Particle::fixed(x, pc.radius)
    } else {
        Particle::new(x, pc.radius)
    };
    if let Some(v) = &pc.v {
        particle = particle.with_displacement(vec3("particles.v", v)? * sub_dt);
    }
    Ok(particle)
}
