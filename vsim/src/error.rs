//! Error type for solver construction and scenario loading
//!
//! Numerical trouble inside `Solver::update` is never reported here: degenerate
//! geometry is skipped locally. Only bad configuration and bad handles are errors.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Time step must be positive and finite.
    InvalidTimeStep(f64),
    /// At least one sub-step per frame is required.
    InvalidSubSteps(usize),
    /// Particle radius must be positive and finite.
    InvalidRadius(f64),
    /// Container size must be positive and finite.
    InvalidContainer { what: &'static str, value: f64 },
    /// Friction must not be positive, it would add energy.
    InvalidFriction(f64),
    /// Collision query radius must be positive and finite.
    InvalidQueryRadius(f64),
    /// Link rest length must be non-negative and finite.
    InvalidLinkDistance(f64),
    /// A link cannot join a particle to itself.
    SelfLink(usize),
    /// Particle handle does not refer to a particle owned by the solver.
    ParticleOutOfBounds { index: usize, count: usize },
    /// A vector field in the configuration did not have three components.
    MalformedVector { field: &'static str, len: usize },
    /// Spawner settings are unusable.
    InvalidSpawner(&'static str),
    /// A configuration value was NaN or infinite.
    NonFinite(&'static str),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidTimeStep(dt) => write!(f, "time step must be positive and finite, got {}", dt),
            SimError::InvalidSubSteps(n) => write!(f, "sub_steps must be at least 1, got {}", n),
            SimError::InvalidRadius(r) => write!(f, "particle radius must be positive and finite, got {}", r),
            SimError::InvalidContainer { what, value } => {
                write!(f, "container {} must be positive and finite, got {}", what, value)
            }
            SimError::InvalidFriction(c) => write!(f, "friction must be zero or negative, got {}", c),
            SimError::InvalidQueryRadius(r) => {
                write!(f, "collision query radius must be positive and finite, got {}", r)
            }
            SimError::InvalidLinkDistance(d) => {
                write!(f, "link target distance must be non-negative and finite, got {}", d)
            }
            SimError::SelfLink(i) => write!(f, "particle {} cannot be linked to itself", i),
            SimError::ParticleOutOfBounds { index, count } => {
                write!(f, "particle index {} out of bounds (count: {})", index, count)
            }
            SimError::MalformedVector { field, len } => {
                write!(f, "`{}` needs 3 components, got {}", field, len)
            }
            SimError::InvalidSpawner(reason) => write!(f, "invalid spawner: {}", reason),
            SimError::NonFinite(field) => write!(f, "`{}` must be finite", field),
        }
    }
}

impl std::error::Error for SimError {}
