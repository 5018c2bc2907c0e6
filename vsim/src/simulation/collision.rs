//! Particle-particle collision detection and response
//!
//! Overlapping pairs are pushed apart along the line between centres by the
//! penetration depth, split evenly. Response is not mass weighted.

use crate::configuration::config::BroadPhaseConfig;
use crate::simulation::grid::UniformGrid;
use crate::simulation::octree::Octree;
use crate::simulation::states::{NVec3, Particle};

/// Candidate pairs `(i, j)`, `i < j`, sorted, for the index-based broad phases.
///
/// `BruteForce` returns every pair; callers normally skip the list for that
/// case and walk the pairs directly.
pub fn candidate_pairs(broad_phase: &BroadPhaseConfig, positions: &[NVec3], radius: f64) -> Vec<(usize, usize)> {
    match broad_phase {
        BroadPhaseConfig::BruteForce => {
            let n = positions.len();
            let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
            for i in 0..n {
                for j in (i + 1)..n {
                    pairs.push((i, j));
                }
            }
            pairs
        }
        BroadPhaseConfig::Octree => Octree::build(positions).query_pairs(positions, radius),
        BroadPhaseConfig::Grid => {
            // Cells a hair wider than the radius keep every pair in adjacent cells despite rounding
            UniformGrid::build(positions, radius * (1.0 + 1e-9)).query_pairs(positions, radius)
        }
    }
}

/// Separate particles `i` and `j` if they overlap.
///
/// With `anchor_fixed`, a fixed particle does not move: its partner takes the
/// whole correction, and two fixed particles are left alone. Otherwise both
/// move by half the overlap regardless of role.
pub fn resolve_pair(particles: &mut [Particle], i: usize, j: usize, anchor_fixed: bool) {
    let axis = particles[i].pos_curr - particles[j].pos_curr;
    let dist = axis.norm();
    if dist == 0.0 {
        log::trace!("collision {}-{}: coincident centres, skipped", i, j);
        return;
    }

    let min_dist = particles[i].radius + particles[j].radius;
    if dist >= min_dist {
        return;
    }

    let n = axis / dist;
    let delta = min_dist - dist;

    let share_i = if anchor_fixed {
        match (particles[i].is_fixed(), particles[j].is_fixed()) {
            (true, true) => return,
            (true, false) => 0.0,
            (false, true) => 1.0,
            (false, false) => 0.5,
        }
    } else {
        0.5
    };

    particles[i].pos_curr += share_i * delta * n;
    particles[j].pos_curr -= (1.0 - share_i) * delta * n;
}

/// Resolve every pair in order, in place.
pub fn resolve_pairs(particles: &mut [Particle], pairs: &[(usize, usize)], anchor_fixed: bool) {
    for &(i, j) in pairs {
        resolve_pair(particles, i, j, anchor_fixed);
    }
}

/// All-pairs scan without an index.
pub fn resolve_brute_force(particles: &mut [Particle], anchor_fixed: bool) {
    let n = particles.len();
    for i in 0..n {
        for j in (i + 1)..n {
            resolve_pair(particles, i, j, anchor_fixed);
        }
    }
}
