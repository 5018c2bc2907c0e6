//! The per-frame physics pipeline
//!
//! `Solver::update` runs `sub_steps` iterations of, in this order:
//! 1. accumulate forces
//! 2. detect and resolve particle-particle collisions
//! 3. enforce the container
//! 4. integrate positions (position Verlet)
//! 5. resolve links
//!
//! The solver owns every particle and link. Links refer to particles by
//! [`ParticleId`], an index into the particle arena, which is stable because
//! particles are never removed.

use crate::configuration::config::RebuildConfig;
use crate::error::SimError;
use crate::simulation::collision::{candidate_pairs, resolve_brute_force, resolve_pairs};
use crate::simulation::constraints::Container;
use crate::simulation::engine::Engine;
use crate::simulation::forces::{Acceleration, ForceSet, RadialPush, UniformGravity, VelocityFriction};
use crate::simulation::integrator::verlet_integrator;
use crate::simulation::params::SolverParams;
use crate::simulation::states::{Link, NVec3, Particle, ParticleId};

pub struct Solver {
    params: SolverParams,
    engine: Engine,
    container: Container,
    forces: ForceSet,
    particles: Vec<Particle>,
    links: Vec<Link>,
    accel_buf: Vec<NVec3>, // scratch for ForceSet output
    pairs: Vec<(usize, usize)>, // candidate pairs reused under RebuildConfig::Frame
    frame: u64,
}

impl Solver {
    /// Validate the configuration and build an empty solver.
    ///
    /// Gravity and (non-zero) friction from `params` are registered as force terms.
    pub fn new(params: SolverParams, engine: Engine, container: Container) -> Result<Self, SimError> {
        params.validate()?;
        container.validate()?;

        let mut forces = ForceSet::new().with(UniformGravity { g: params.gravity });
        if params.friction != 0.0 {
            forces.push(VelocityFriction { coefficient: params.friction });
        }

        Ok(Self {
            params,
            engine,
            container,
            forces,
            particles: Vec::new(),
            links: Vec::new(),
            accel_buf: Vec::new(),
            pairs: Vec::new(),
            frame: 0,
        })
    }

    /// Register an extra acceleration term, evaluated every sub-step.
    pub fn with_force(mut self, term: impl Acceleration + Send + Sync + 'static) -> Self {
        self.forces.push(term);
        self
    }

    /// Advance one frame: `sub_steps` sub-steps of `time_step / sub_steps`.
    pub fn update(&mut self) {
        let sub_dt = self.params.sub_dt();
        for step in 0..self.params.sub_steps {
            self.apply_forces();
            if !self.particles.is_empty() {
                self.resolve_collisions(step);
            }
            self.container.apply(&mut self.particles, self.params.anchor_fixed);
            verlet_integrator(&mut self.particles, sub_dt);
            self.update_links();
        }
        self.frame += 1;
    }

    /// Add a particle; it takes part from the next `update()` on.
    pub fn add_object(&mut self, particle: Particle) -> Result<ParticleId, SimError> {
        if !(particle.radius.is_finite() && particle.radius > 0.0) {
            return Err(SimError::InvalidRadius(particle.radius));
        }
        if !(particle.pos_curr.iter().chain(particle.pos_old.iter()).all(|c| c.is_finite())) {
            return Err(SimError::NonFinite("particle position"));
        }
        if self.engine.uses_index() && 2.0 * particle.radius > self.params.query_radius {
            log::warn!(
                "particle diameter {} exceeds collision query radius {}; overlaps may be missed",
                2.0 * particle.radius,
                self.params.query_radius
            );
        }

        let id = ParticleId(self.particles.len());
        self.particles.push(particle);
        Ok(id)
    }

    /// Add a distance constraint unless the unordered pair is already linked.
    ///
    /// Returns `Ok(false)` for a duplicate (in either order).
    pub fn add_link(&mut self, target: f64, a: ParticleId, b: ParticleId) -> Result<bool, SimError> {
        let count = self.particles.len();
        for id in [a, b] {
            if id.index() >= count {
                return Err(SimError::ParticleOutOfBounds { index: id.index(), count });
            }
        }
        if a == b {
            return Err(SimError::SelfLink(a.index()));
        }
        if !(target.is_finite() && target >= 0.0) {
            return Err(SimError::InvalidLinkDistance(target));
        }

        if self.links.iter().any(|l| l.connects(a, b)) {
            log::debug!("link {}-{} already exists, ignored", a.index(), b.index());
            return Ok(false);
        }

        self.links.push(Link { a, b, target });
        Ok(true)
    }

    /// One-shot radial acceleration away from `center`.
    ///
    /// Lands in the accumulators, so it acts on the first sub-step of the
    /// next `update()` and is then cleared by integration.
    pub fn expanding_force(&mut self, center: NVec3, strength: f64) {
        self.accel_buf.resize(self.particles.len(), NVec3::zeros());
        ForceSet::new()
            .with(RadialPush { center, strength })
            .accumulate_accels(&self.particles, &mut self.accel_buf);
        for (p, a) in self.particles.iter_mut().zip(self.accel_buf.iter()) {
            p.acceleration += a;
        }
    }

    // accessors ==============================================================================

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id.index())
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Current positions of both ends of a link, for drawing.
    pub fn link_endpoints(&self, link: &Link) -> Option<(NVec3, NVec3)> {
        let a = self.particle(link.a)?;
        let b = self.particle(link.b)?;
        Some((a.pos_curr, b.pos_curr))
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Number of completed `update()` calls.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    // pipeline stages ========================================================================

    fn apply_forces(&mut self) {
        self.accel_buf.resize(self.particles.len(), NVec3::zeros());
        self.forces.accumulate_accels(&self.particles, &mut self.accel_buf);
        for (p, a) in self.particles.iter_mut().zip(self.accel_buf.iter()) {
            p.acceleration += a;
        }
    }

    fn resolve_collisions(&mut self, step: usize) {
        let anchor_fixed = self.params.anchor_fixed;
        if !self.engine.uses_index() {
            resolve_brute_force(&mut self.particles, anchor_fixed);
            return;
        }

        let rebuild = match self.engine.rebuild {
            RebuildConfig::SubStep => true,
            RebuildConfig::Frame => step == 0,
        };
        if rebuild {
            let positions: Vec<NVec3> = self.particles.iter().map(|p| p.pos_curr).collect();
            self.pairs = candidate_pairs(&self.engine.broad_phase, &positions, self.params.query_radius);
        }
        resolve_pairs(&mut self.particles, &self.pairs, anchor_fixed);
    }

    fn update_links(&mut self) {
        for link in &self.links {
            link.apply(&mut self.particles);
        }
    }
}
