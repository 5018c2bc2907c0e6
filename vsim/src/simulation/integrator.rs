//! Position Verlet integration
//!
//! Velocity is implicit in `pos_curr - pos_old`, so constraint passes that
//! move `pos_curr` directly also change the next step's velocity.

use super::states::{NVec3, Particle};

/// Advance every particle by one sub-step of size `dt`.
///
/// x_n+1 = x_n + (x_n - x_n-1) + a * dt^2
///
/// Fixed particles keep their position; every particle has its
/// acceleration cleared.
pub fn verlet_integrator(particles: &mut [Particle], dt: f64) {
    let dt2 = dt * dt;
    for p in particles.iter_mut() {
        if !p.is_fixed() {
            let displacement = p.pos_curr - p.pos_old;
            p.pos_old = p.pos_curr;
            p.pos_curr += displacement + p.acceleration * dt2;
        }
        p.acceleration = NVec3::zeros();
    }
}
