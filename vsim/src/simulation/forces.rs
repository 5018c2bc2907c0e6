//! Acceleration contributors applied at the start of every sub-step
//!
//! Each term implements [`Acceleration`]; a [`ForceSet`] sums all terms into
//! a scratch buffer which the solver then adds onto each particle

use crate::simulation::states::{NVec3, Particle};

/// Collection of acceleration terms (gravity, friction, user terms).
/// Contributions are summed into a single acceleration vector per particle
#[derive(Default)]
pub struct ForceSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl ForceSet {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add an acceleration term
    pub fn with(mut self, term: impl Acceleration + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    pub fn push(&mut self, term: impl Acceleration + Send + Sync + 'static) {
        self.terms.push(Box::new(term));
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// `out[i]` is set to the sum of every term's contribution for particle `i`
    pub fn accumulate_accels(&self, particles: &[Particle], out: &mut [NVec3]) {
        for a in out.iter_mut() {
            *a = NVec3::zeros();
        }
        for term in &self.terms {
            term.acceleration(particles, out);
        }
    }
}

/// Acceleration source; implementations add into `out[i]` for each particle
pub trait Acceleration {
    fn acceleration(&self, particles: &[Particle], out: &mut [NVec3]);
}

/// Constant acceleration, the same for every particle
pub struct UniformGravity {
    pub g: NVec3,
}

impl Acceleration for UniformGravity {
    fn acceleration(&self, particles: &[Particle], out: &mut [NVec3]) {
        for a in out.iter_mut().take(particles.len()) {
            *a += self.g;
        }
    }
}

/// Velocity-proportional friction: a fixed-magnitude push along the
/// direction of implicit motion. `coefficient` is negative so it opposes
/// motion. Particles at rest get nothing.
pub struct VelocityFriction {
    pub coefficient: f64,
}

impl Acceleration for VelocityFriction {
    fn acceleration(&self, particles: &[Particle], out: &mut [NVec3]) {
        for (p, a) in particles.iter().zip(out.iter_mut()) {
            let disp = p.displacement();
            let dist = disp.norm();
            if dist > 0.0 {
                *a += (disp / dist) * self.coefficient;
            }
        }
    }
}

/// Radial push away from `center`, scaled by `strength`.
/// A particle sitting exactly on the centre has no direction and is skipped.
pub struct RadialPush {
    pub center: NVec3,
    pub strength: f64,
}

impl Acceleration for RadialPush {
    fn acceleration(&self, particles: &[Particle], out: &mut [NVec3]) {
        for (p, a) in particles.iter().zip(out.iter_mut()) {
            let disp = p.pos_curr - self.center;
            let dist = disp.norm();
            if dist > 0.0 {
                *a += (disp / dist) * self.strength;
            }
        }
    }
}
