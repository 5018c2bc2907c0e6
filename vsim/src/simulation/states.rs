//! Core state types for the particle solver
//!
//! - `Particle`   a Verlet point mass (current/previous position, accumulated acceleration)
//! - `Role`       free or fixed (anchor)
//! - `ParticleId` stable handle into the solver's particle arena
//! - `Link`       distance constraint between two handles
//!
//! Velocity is never stored: it is `pos_curr - pos_old` per sub-step.

use nalgebra::Vector3;
pub type NVec3 = Vector3<f64>;

/// Whether a particle takes part in integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    Free,
    Fixed, // never integrated, absorbs no link correction
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub pos_curr: NVec3, // position at the current sub-step
    pub pos_old: NVec3, // position one sub-step ago
    pub acceleration: NVec3, // accumulated this sub-step, cleared by integration
    pub radius: f64, // collision radius and container clearance
    pub role: Role,
}

impl Particle {
    /// A free particle at rest.
    pub fn new(position: NVec3, radius: f64) -> Self {
        Self {
            pos_curr: position,
            pos_old: position,
            acceleration: NVec3::zeros(),
            radius,
            role: Role::Free,
        }
    }

    /// A fixed anchor particle.
    pub fn fixed(position: NVec3, radius: f64) -> Self {
        Self {
            role: Role::Fixed,
            ..Self::new(position, radius)
        }
    }

    /// Give the particle an initial per-sub-step displacement.
    pub fn with_displacement(mut self, displacement: NVec3) -> Self {
        self.pos_old = self.pos_curr - displacement;
        self
    }

    pub fn is_fixed(&self) -> bool {
        self.role == Role::Fixed
    }

    /// Implicit velocity, in distance per sub-step.
    pub fn displacement(&self) -> NVec3 {
        self.pos_curr - self.pos_old
    }
}

/// Handle to a particle owned by a `Solver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub usize);

impl ParticleId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Distance constraint pulling `a` and `b` toward `target` separation.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub a: ParticleId,
    pub b: ParticleId,
    pub target: f64,
}

impl Link {
    /// True if this link joins the same unordered pair.
    pub fn connects(&self, a: ParticleId, b: ParticleId) -> bool {
        (self.a == a && self.b == b) || (self.a == b && self.b == a)
    }

    /// Move the endpoints toward the rest length.
    ///
    /// A fixed endpoint does not move and the other end takes the full
    /// correction; two fixed endpoints are left untouched.
    pub fn apply(&self, particles: &mut [Particle]) {
        let (ia, ib) = (self.a.index(), self.b.index());
        let (a_fixed, b_fixed) = (particles[ia].is_fixed(), particles[ib].is_fixed());
        if a_fixed && b_fixed {
            return;
        }

        let disp = particles[ia].pos_curr - particles[ib].pos_curr;
        let dist = disp.norm();
        if dist == 0.0 {
            log::trace!("link {}-{}: coincident endpoints, skipped", ia, ib);
            return;
        }

        let n = disp / dist;
        let delta = self.target - dist;
        let percent = if a_fixed {
            0.0
        } else if b_fixed {
            1.0
        } else {
            0.5
        };

        particles[ia].pos_curr += percent * delta * n;
        particles[ib].pos_curr -= (1.0 - percent) * delta * n;
    }
}
