use proptest::prelude::*;

use vsim::simulation::collision::{candidate_pairs, resolve_pair};
use vsim::{BroadPhaseConfig, Container, Particle, NVec3};

fn brute_pairs_within(positions: &[NVec3], radius: f64) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            if (positions[i] - positions[j]).norm_squared() <= radius * radius {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

fn point(range: f64) -> impl Strategy<Value = NVec3> {
    (-range..range, -range..range, -range..range).prop_map(|(x, y, z)| NVec3::new(x, y, z))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn octree_pairs_match_brute_force(
        positions in prop::collection::vec(point(2.0), 0..80),
        radius in 0.05f64..1.0,
    ) {
        let expected = brute_pairs_within(&positions, radius);
        let got = candidate_pairs(&BroadPhaseConfig::Octree, &positions, radius);
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn grid_pairs_match_brute_force(
        positions in prop::collection::vec(point(2.0), 0..80),
        radius in 0.05f64..1.0,
    ) {
        let expected = brute_pairs_within(&positions, radius);
        let got = candidate_pairs(&BroadPhaseConfig::Grid, &positions, radius);
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn octree_handles_clustered_points(
        base in point(1.0),
        offsets in prop::collection::vec(point(1e-6), 1..40),
    ) {
        // Near-coincident cloud deeper than the split limit
        let positions: Vec<NVec3> = offsets.iter().map(|o| base + o).collect();
        let n = positions.len();
        let got = candidate_pairs(&BroadPhaseConfig::Octree, &positions, 0.1);
        prop_assert_eq!(got.len(), n * (n - 1) / 2);
    }

    #[test]
    fn resolved_pair_touches_and_keeps_midpoint(
        a in point(1.0),
        dir in point(1.0),
        ra in 0.05f64..0.5,
        rb in 0.05f64..0.5,
        frac in 0.05f64..0.95,
    ) {
        prop_assume!(dir.norm() > 1e-3);
        let b = a + dir.normalize() * (ra + rb) * frac;
        let mut particles = vec![Particle::new(a, ra), Particle::new(b, rb)];
        let mid = (a + b) * 0.5;

        resolve_pair(&mut particles, 0, 1, false);

        let d = (particles[0].pos_curr - particles[1].pos_curr).norm();
        prop_assert!((d - (ra + rb)).abs() < 1e-9);
        let new_mid = (particles[0].pos_curr + particles[1].pos_curr) * 0.5;
        prop_assert!((new_mid - mid).norm() < 1e-9);
    }

    #[test]
    fn sphere_container_contains_after_constrain(
        p in point(10.0),
        radius in 0.05f64..1.0,
    ) {
        let container = Container::sphere(NVec3::new(0.5, -0.5, 0.0), 4.0);
        let mut particle = Particle::new(p, radius);

        container.constrain(&mut particle);

        prop_assert!(container.violation(&particle) < 1e-9);
        prop_assert!(particle.pos_curr.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn cuboid_container_contains_after_constrain(
        p in point(10.0),
        v in point(0.5),
        radius in 0.05f64..1.0,
    ) {
        let container = Container::cuboid(NVec3::zeros(), 2.5);
        let mut particle = Particle::new(p, radius).with_displacement(v);

        container.constrain(&mut particle);

        prop_assert!(container.violation(&particle) < 1e-9);
    }
}
