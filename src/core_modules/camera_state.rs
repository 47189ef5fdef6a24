// THEORY:
// The `CameraState` is the heart of the validation layer. It is a stateful entity
// responsible for a single camera watching the yard. Its job is to observe the
// stream of incoming frames for that camera and decide, frame by frame, whether
// the yard is unchanged, the camera itself has been knocked out of alignment, or
// a container has genuinely moved.
//
// Key architectural principles:
// 1.  **Reference Memory**: A `CameraState` holds the last accepted frame (the
//     "reference") and an append-only history of every frame it ever accepted, in
//     capture order. The reference is always the newest history entry.
// 2.  **Orientation-Aware Filtering**: A `Lateral` camera sees stacks in profile, so
//     floating artifacts are stripped with the gravity filter and the frame is
//     checked for a rigid camera shift before anything else. An `Overhead` camera
//     skips both and goes straight to the pixel difference.
// 3.  **Query Before Commit**: `evaluate` is a pure query that never touches the
//     history. `ingest` is `evaluate` followed by `commit` on acceptance. This split
//     is what lets the rig validate three cameras before mutating any of them.
// 4.  **Archive the Original**: Filtering only decides acceptance. The history keeps
//     the unfiltered candidate. A `Lateral` camera compares every candidate against
//     the gravity-filtered reference, so an artifact that slipped into an accepted
//     frame never becomes a difference that later, filtered candidates can't match.

use crate::core_modules::frame_comparator::{Shift, frame_comparator};
use crate::core_modules::grid::grid::Grid;
use crate::error::{BuildError, GridError};
use log::{debug, warn};
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// Number of differing cells tolerated before a frame counts as a change.
pub const DEFAULT_CHANGE_TOLERANCE: usize = 0;

/// Which way a camera faces the cargo. Fixed for the lifetime of the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Faces the front or the side of the stacks. Gravity filter and shift check apply.
    Lateral,
    /// Looks down on the yard. No gravity filter, no shift check.
    Overhead,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Lateral => f.write_str("lateral"),
            Orientation::Overhead => f.write_str("overhead"),
        }
    }
}

/// Why a candidate frame was turned away. Neither variant mutates the camera.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    /// The frame is an exact translation of the reference: the camera moved, not the cargo.
    #[error("camera shift of {shift} detected, please fix immediately")]
    ShiftDetected { shift: Shift },

    /// The cargo changed. `before` and `after` are the frames as compared, i.e. after filtering.
    #[error("changes detected in {differences} cells: {before} to {after}")]
    ChangeDetected {
        before: Grid,
        after: Grid,
        differences: usize,
    },
}

/// The decision for a candidate frame, before anything is committed.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accept,
    Reject(Rejection),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// The result of ingesting a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// The frame was appended to the history and is now the reference.
    Accepted,
    Rejected(Rejection),
}

/// A stateful validator for a single camera.
#[derive(Debug, Clone)]
pub struct CameraState {
    // --- Identity ---
    /// Which way the camera faces the cargo.
    orientation: Orientation,
    /// Differing cells allowed before a frame is treated as a change.
    change_tolerance: usize,

    // --- Memory ---
    /// The most recently accepted frame, unfiltered.
    reference: Grid,
    /// Every accepted frame in capture order, bootstrap first. Ends with `reference`.
    history: Vec<Grid>,
}

impl CameraState {
    pub fn builder() -> CameraBuilder {
        CameraBuilder::default()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn change_tolerance(&self) -> usize {
        self.change_tolerance
    }

    /// The most recently accepted frame.
    pub fn reference(&self) -> &Grid {
        &self.reference
    }

    /// Every accepted frame, oldest first.
    pub fn history(&self) -> &[Grid] {
        &self.history
    }

    /// Decides what would happen to `candidate` without touching the camera.
    pub fn evaluate(&self, candidate: &Grid) -> Result<Verdict, GridError> {
        if !self.reference.same_shape(candidate) {
            return Err(GridError::DimensionMismatch {
                expected: self.reference.dimensions(),
                found: candidate.dimensions(),
            });
        }

        let (basis, filtered) = match self.orientation {
            Orientation::Lateral => (
                Cow::Owned(frame_comparator::remove_float(&self.reference)),
                frame_comparator::remove_float(candidate),
            ),
            Orientation::Overhead => (Cow::Borrowed(&self.reference), candidate.clone()),
        };

        if self.orientation == Orientation::Lateral {
            if let Some(shift) = frame_comparator::find_shift(&basis, &filtered)? {
                return Ok(Verdict::Reject(Rejection::ShiftDetected { shift }));
            }
        }

        let differences = frame_comparator::count_differences(&basis, &filtered)?;
        if differences > self.change_tolerance {
            return Ok(Verdict::Reject(Rejection::ChangeDetected {
                before: basis.into_owned(),
                after: filtered,
                differences,
            }));
        }

        Ok(Verdict::Accept)
    }

    /// Validates `candidate` and, if it is accepted, archives it as the new reference.
    pub fn ingest(&mut self, candidate: Grid) -> Result<IngestOutcome, GridError> {
        match self.evaluate(&candidate)? {
            Verdict::Accept => {
                self.commit(candidate);
                Ok(IngestOutcome::Accepted)
            }
            Verdict::Reject(rejection) => {
                warn!("{} camera rejected frame: {}", self.orientation, rejection);
                Ok(IngestOutcome::Rejected(rejection))
            }
        }
    }

    /// Appends a frame that has already been accepted by `evaluate`.
    pub(crate) fn commit(&mut self, candidate: Grid) {
        self.history.push(candidate.clone());
        self.reference = candidate;
        debug!(
            "{} camera accepted frame #{}: {}",
            self.orientation,
            self.history.len() - 1,
            self.reference
        );
    }
}

/// Two cameras are equal when they face the same way and hold the same reference frame.
impl PartialEq for CameraState {
    fn eq(&self, other: &Self) -> bool {
        self.orientation == other.orientation && self.reference() == other.reference()
    }
}

/// Staged construction of a `CameraState`. Fields are validated once, in `build`.
#[derive(Debug, Clone)]
pub struct CameraBuilder {
    bootstrap: Option<Grid>,
    orientation: Option<Orientation>,
    change_tolerance: usize,
}

impl Default for CameraBuilder {
    fn default() -> Self {
        Self {
            bootstrap: None,
            orientation: None,
            change_tolerance: DEFAULT_CHANGE_TOLERANCE,
        }
    }
}

impl CameraBuilder {
    /// The first frame the camera captured. It becomes the initial reference.
    pub fn bootstrap(mut self, frame: Grid) -> Self {
        self.bootstrap = Some(frame);
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn change_tolerance(mut self, cells: usize) -> Self {
        self.change_tolerance = cells;
        self
    }

    pub fn build(self) -> Result<CameraState, BuildError> {
        let bootstrap = self.bootstrap.ok_or(BuildError::MissingField("bootstrap"))?;
        let orientation = self.orientation.ok_or(BuildError::MissingField("orientation"))?;
        Ok(CameraState {
            orientation,
            change_tolerance: self.change_tolerance,
            history: vec![bootstrap.clone()],
            reference: bootstrap,
        })
    }
}
