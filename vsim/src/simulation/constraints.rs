//! Static convex containers that keep particles inside
//!
//! - `Sphere` clamps a particle back onto the inner shell (no velocity change;
//!   the next Verlet step sees the clamp as motion)
//! - `Cuboid` clamps per axis and mirrors the previous position so the normal
//!   component of implicit velocity is reflected

use crate::error::SimError;
use crate::simulation::states::{NVec3, Particle};

#[derive(Debug, Clone, PartialEq)]
pub enum Container {
    Sphere { center: NVec3, radius: f64 },
    Cuboid { center: NVec3, half_extent: f64 },
}

impl Container {
    pub fn sphere(center: NVec3, radius: f64) -> Self {
        Container::Sphere { center, radius }
    }

    pub fn cuboid(center: NVec3, half_extent: f64) -> Self {
        Container::Cuboid { center, half_extent }
    }

    /// Centre of the container.
    pub fn position(&self) -> NVec3 {
        match self {
            Container::Sphere { center, .. } | Container::Cuboid { center, .. } => *center,
        }
    }

    /// Radius of a sphere, half edge of a cube.
    pub fn scale(&self) -> f64 {
        match self {
            Container::Sphere { radius, .. } => *radius,
            Container::Cuboid { half_extent, .. } => *half_extent,
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !self.position().iter().all(|c| c.is_finite()) {
            return Err(SimError::NonFinite("container center"));
        }
        let (what, value) = match self {
            Container::Sphere { radius, .. } => ("radius", *radius),
            Container::Cuboid { half_extent, .. } => ("half_extent", *half_extent),
        };
        if !(value.is_finite() && value > 0.0) {
            return Err(SimError::InvalidContainer { what, value });
        }
        Ok(())
    }

    /// How far `p` sticks out past its allowed region (0 when inside).
    pub fn violation(&self, p: &Particle) -> f64 {
        match self {
            Container::Sphere { center, radius } => {
                ((p.pos_curr - center).norm() - (radius - p.radius)).max(0.0)
            }
            Container::Cuboid { center, half_extent } => {
                let limit = half_extent - p.radius;
                let local = p.pos_curr - center;
                local.iter().map(|c| (c.abs() - limit).max(0.0)).fold(0.0, f64::max)
            }
        }
    }

    /// Project one particle back inside.
    pub fn constrain(&self, p: &mut Particle) {
        match self {
            Container::Sphere { center, radius } => {
                let disp = p.pos_curr - center;
                let dist = disp.norm();
                let limit = radius - p.radius;
                if dist > limit {
                    if dist == 0.0 {
                        // Only reachable when the particle is wider than the container
                        log::trace!("particle at container centre has no push-out direction");
                        return;
                    }
                    p.pos_curr = center + (disp / dist) * limit;
                }
            }
            Container::Cuboid { center, half_extent } => {
                let limit = half_extent - p.radius;
                for axis in 0..3 {
                    let lo = center[axis] - limit;
                    let hi = center[axis] + limit;
                    let bound = if p.pos_curr[axis] < lo {
                        lo
                    } else if p.pos_curr[axis] > hi {
                        hi
                    } else {
                        continue;
                    };
                    let disp = p.pos_curr[axis] - p.pos_old[axis];
                    p.pos_curr[axis] = bound;
                    p.pos_old[axis] = bound + disp;
                }
            }
        }
    }

    /// Constrain every particle; with `anchor_fixed` fixed particles are skipped.
    pub fn apply(&self, particles: &mut [Particle], anchor_fixed: bool) {
        for p in particles.iter_mut() {
            if anchor_fixed && p.is_fixed() {
                continue;
            }
            self.constrain(p);
        }
    }
}
