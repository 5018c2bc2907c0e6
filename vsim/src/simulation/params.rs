//! Numerical and physical parameters for the solver
//!
//! `SolverParams` holds what used to be global constants:
//! - frame time step and sub-step count,
//! - gravity and velocity-proportional friction,
//! - collision query radius for the spatial index,
//! - the fixed-particle anchor policy

use crate::error::SimError;
use crate::simulation::states::NVec3;

#[derive(Debug, Clone, PartialEq)]
pub struct SolverParams {
    pub time_step: f64, // frame interval, split evenly across sub-steps
    pub sub_steps: usize, // pipeline repetitions per update()
    pub gravity: NVec3, // constant acceleration applied to every particle
    pub friction: f64, // zero or negative: opposes the direction of motion
    pub query_radius: f64, // neighbour radius for tree/grid broad phases
    pub anchor_fixed: bool, // fixed particles also ignore collisions and the container
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            time_step: 0.0015,
            sub_steps: 1,
            gravity: NVec3::new(0.0, -1000.0, 0.0),
            friction: -100.0,
            query_radius: 0.4,
            anchor_fixed: false,
        }
    }
}

impl SolverParams {
    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    pub fn with_sub_steps(mut self, sub_steps: usize) -> Self {
        self.sub_steps = sub_steps;
        self
    }

    pub fn with_gravity(mut self, gravity: NVec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_query_radius(mut self, query_radius: f64) -> Self {
        self.query_radius = query_radius;
        self
    }

    pub fn with_anchor_fixed(mut self, anchor_fixed: bool) -> Self {
        self.anchor_fixed = anchor_fixed;
        self
    }

    /// Size of one sub-step.
    pub fn sub_dt(&self) -> f64 {
        self.time_step / self.sub_steps as f64
    }

    /// Reject configurations the solver cannot run meaningfully.
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(SimError::InvalidTimeStep(self.time_step));
        }
        if self.sub_steps == 0 {
            return Err(SimError::InvalidSubSteps(self.sub_steps));
        }
        if !self.gravity.iter().all(|g| g.is_finite()) {
            return Err(SimError::NonFinite("gravity"));
        }
        if !self.friction.is_finite() {
            return Err(SimError::NonFinite("friction"));
        }
        if self.friction > 0.0 {
            return Err(SimError::InvalidFriction(self.friction));
        }
        if !(self.query_radius.is_finite() && self.query_radius > 0.0) {
            return Err(SimError::InvalidQueryRadius(self.query_radius));
        }
        Ok(())
    }
}
