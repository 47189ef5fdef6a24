// THEORY:
// Every failure the engine can report lives here, grouped by the boundary that
// raises it. Frame rejections (a camera shift, a moved container) are NOT in this
// file: they are expected outcomes of ingesting a frame and live next to the
// camera state machine as `Rejection`. The enums below cover malformed input,
// misconfigured builders, and the aggregate failure of a rig intake.

use crate::core_modules::camera_state::Rejection;
use crate::rig::Role;
use thiserror::Error;

/// Errors raised by grid construction and by comparisons between grids.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The pixel matrix is not rectangular or could not be parsed.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// Two grids of different shape were compared.
    #[error("dimension mismatch: expected {expected:?} (rows, cols), found {found:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

/// Usage errors surfaced when a builder is asked to produce its product.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("maximum height must be set before the height map")]
    OrderingViolation,

    #[error("invalid height {value}: {reason}")]
    InvalidHeight { value: i32, reason: &'static str },

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Failure of a triplet intake on a rig. No camera is mutated when this is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntakeError {
    #[error("{role} camera rejected the frame: {rejection}")]
    Rejected { role: Role, rejection: Rejection },

    #[error("{role} camera: {source}")]
    Grid {
        role: Role,
        #[source]
        source: GridError,
    },
}

impl IntakeError {
    /// The camera role that caused the intake to fail.
    pub fn role(&self) -> Role {
        match self {
            IntakeError::Rejected { role, .. } | IntakeError::Grid { role, .. } => *role,
        }
    }
}

/// Errors raised by the `RigMonitor` handle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MonitorError {
    #[error("rig monitor task is no longer running")]
    Closed,

    #[error(transparent)]
    Intake(#[from] IntakeError),
}

/// Errors raised while loading a `RigConfig`.
#[cfg(feature = "serde")]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse rig config: {0}")]
    Parse(#[from] serde_json::Error),
}
