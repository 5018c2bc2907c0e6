use std::time::Instant;

use crate::configuration::config::{BroadPhaseConfig, RebuildConfig};
use crate::error::SimError;
use crate::simulation::collision::candidate_pairs;
use crate::simulation::constraints::Container;
use crate::simulation::engine::Engine;
use crate::simulation::params::SolverParams;
use crate::simulation::solver::Solver;
use crate::simulation::states::{NVec3, Particle};

const RADIUS: f64 = 0.05;

/// Deterministic particle cloud inside a sphere of radius ~3, no rand needed
fn make_positions(n: usize) -> Vec<NVec3> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            NVec3::new(
                (i_f * 0.37).sin() * 3.0,
                (i_f * 0.13).cos() * 2.0,
                (i_f * 0.07).sin() * 2.0,
            )
        })
        .collect()
}

fn make_params() -> SolverParams {
    SolverParams::default()
        .with_sub_steps(8)
        .with_query_radius(2.0 * RADIUS)
}

/// Helper to build a solver of size `n` using the given broad phase
fn make_solver(n: usize, broad_phase: BroadPhaseConfig) -> Result<Solver, SimError> {
    let engine = Engine::new(broad_phase, RebuildConfig::SubStep);
    let container = Container::sphere(NVec3::zeros(), 4.0);
    let mut solver = Solver::new(make_params(), engine, container)?;
    for p in make_positions(n) {
        solver.add_object(Particle::new(p, RADIUS))?;
    }
    Ok(solver)
}

/// Average wall time of one `update()` in milliseconds
fn time_updates(solver: &mut Solver, frames: usize) -> f64 {
    // Warm up
    solver.update();

    let t0 = Instant::now();
    for _ in 0..frames {
        solver.update();
    }
    t0.elapsed().as_secs_f64() * 1000.0 / frames as f64
}

/// Compare a full `update()` under each broad phase for a range of n,
/// plus the bare pair query cost.
pub fn bench_broad_phase() -> Result<(), SimError> {
    let ns = [100, 200, 400, 800, 1600, 3200];
    let frames = 3;

    for n in ns {
        // Brute force gets slow fast; cap it
        let brute_ms = if n <= 1600 {
            let mut solver = make_solver(n, BroadPhaseConfig::BruteForce)?;
            format!("{:10.3}", time_updates(&mut solver, frames))
        } else {
            format!("{:>10}", "-")
        };

        let mut solver_octree = make_solver(n, BroadPhaseConfig::Octree)?;
        let octree_ms = time_updates(&mut solver_octree, frames);

        let mut solver_grid = make_solver(n, BroadPhaseConfig::Grid)?;
        let grid_ms = time_updates(&mut solver_grid, frames);

        // Pair query alone, on the initial cloud
        let positions = make_positions(n);
        let t0 = Instant::now();
        let pairs = candidate_pairs(&BroadPhaseConfig::Octree, &positions, 2.0 * RADIUS);
        let query_ms = t0.elapsed().as_secs_f64() * 1000.0;

        println!(
            "N = {:5}, brute = {} ms, octree = {:10.3} ms, grid = {:10.3} ms, octree query = {:8.3} ms ({} pairs)",
            n, brute_ms, octree_ms, grid_ms, query_ms, pairs.len()
        );
    }

    Ok(())
}

/// CSV of update cost against particle count for plotting
pub fn bench_broad_phase_curve() -> Result<(), SimError> {
    println!("N,brute_ms,octree_ms,grid_ms");

    for n in (100..=2000).step_by(100) {
        let mut solver_brute = make_solver(n, BroadPhaseConfig::BruteForce)?;
        let mut solver_octree = make_solver(n, BroadPhaseConfig::Octree)?;
        let mut solver_grid = make_solver(n, BroadPhaseConfig::Grid)?;

        let ms_brute = time_updates(&mut solver_brute, 1);
        let ms_octree = time_updates(&mut solver_octree, 2);
        let ms_grid = time_updates(&mut solver_grid, 2);

        println!("{},{:.6},{:.6},{:.6}", n, ms_brute, ms_octree, ms_grid);
    }

    Ok(())
}
