//! Read-only health measurements of a solver state
//!
//! Used by the driver's periodic log line and by tests checking the
//! separation / containment / link invariants. Overlap is measured over all
//! pairs, so this is O(n^2).

use crate::simulation::solver::Solver;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    pub particles: usize,
    pub links: usize,
    pub max_overlap: f64, // deepest pair penetration, 0 when separated
    pub max_container_violation: f64, // furthest any particle sits past the wall
    pub max_link_strain: f64, // largest |distance - target| over links
    pub non_finite: bool, // any NaN/inf position
}

impl Diagnostics {
    pub fn measure(solver: &Solver) -> Self {
        let particles = solver.particles();
        let container = solver.container();

        let mut max_overlap: f64 = 0.0;
        for (i, a) in particles.iter().enumerate() {
            for b in &particles[i + 1..] {
                let dist = (a.pos_curr - b.pos_curr).norm();
                max_overlap = max_overlap.max(a.radius + b.radius - dist);
            }
        }

        let max_container_violation = particles
            .iter()
            .map(|p| container.violation(p))
            .fold(0.0, f64::max);

        let max_link_strain = solver
            .links()
            .iter()
            .filter_map(|l| solver.link_endpoints(l).map(|(a, b)| ((a - b).norm() - l.target).abs()))
            .fold(0.0, f64::max);

        let non_finite = particles
            .iter()
            .any(|p| !p.pos_curr.iter().all(|c| c.is_finite()));

        Self {
            particles: particles.len(),
            links: solver.link_count(),
            max_overlap,
            max_container_violation,
            max_link_strain,
            non_finite,
        }
    }
}
