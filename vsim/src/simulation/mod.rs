pub mod states;
pub mod params;
pub mod engine;
pub mod forces;
pub mod integrator;
pub mod octree;
pub mod grid;
pub mod collision;
pub mod constraints;
pub mod solver;
pub mod spawner;
pub mod scenario;
pub mod diagnostics;
