// THEORY:
// The `rig` module is the top-level API of the monitoring engine. It binds three
// `CameraState`s to the front, side and top of the yard and exposes one intake
// operation for a triplet of frames. Callers never talk to individual cameras to
// feed them; they hand the rig a triplet and get back either success or the first
// rejection.
//
// Intake runs in two phases. First every camera evaluates its frame without
// mutating anything, in the fixed order side, front, top. Only if all three accept
// are the frames committed. A rejection or a malformed frame therefore leaves the
// whole rig exactly as it was, never half-updated.

use crate::core_modules::camera_state::{
    CameraState, DEFAULT_CHANGE_TOLERANCE, Orientation, Rejection, Verdict,
};
use crate::core_modules::grid::grid::Grid;
use crate::core_modules::silhouette;
use crate::error::{BuildError, IntakeError};
use log::{info, warn};
use std::fmt;

/// Default capacity of the `RigMonitor` request queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// The position a camera occupies on the rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Front,
    Side,
    Top,
}

impl Role {
    /// The order in which intake evaluates the cameras.
    pub const INTAKE_ORDER: [Role; 3] = [Role::Side, Role::Front, Role::Top];

    pub fn orientation(&self) -> Orientation {
        match self {
            Role::Front | Role::Side => Orientation::Lateral,
            Role::Top => Orientation::Overhead,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Front => f.write_str("front"),
            Role::Side => f.write_str("side"),
            Role::Top => f.write_str("top"),
        }
    }
}

/// Configuration for a rig, allowing for tunable behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RigConfig {
    /// The height of the tallest stack the yard may hold, in levels.
    pub max_height: i32,
    /// Differing cells a camera tolerates before it reports a change. Zero means exact.
    pub change_tolerance: usize,
    /// Capacity of the request queue in front of a `RigMonitor`.
    pub queue_capacity: usize,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            max_height: 0,
            change_tolerance: DEFAULT_CHANGE_TOLERANCE,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

#[cfg(feature = "serde")]
impl RigConfig {
    /// Parses a config from JSON text. Missing fields fall back to their defaults.
    pub fn from_json(text: &str) -> Result<Self, crate::error::ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Every camera's decision for one triplet, in intake order.
#[derive(Debug, Clone, PartialEq)]
pub struct RigVerdict {
    pub verdicts: [(Role, Verdict); 3],
}

impl RigVerdict {
    pub fn is_accept(&self) -> bool {
        self.verdicts.iter().all(|(_, verdict)| verdict.is_accept())
    }

    /// The first rejection in intake order, if any.
    pub fn first_rejection(&self) -> Option<(Role, &Rejection)> {
        self.verdicts.iter().find_map(|(role, verdict)| match verdict {
            Verdict::Reject(rejection) => Some((*role, rejection)),
            Verdict::Accept => None,
        })
    }
}

/// The three cameras watching one yard.
#[derive(Debug, Clone, PartialEq)]
pub struct RigView {
    front: CameraState,
    side: CameraState,
    top: CameraState,
}

impl RigView {
    pub fn builder() -> RigBuilder {
        RigBuilder::default()
    }

    pub fn front(&self) -> &CameraState {
        &self.front
    }

    pub fn side(&self) -> &CameraState {
        &self.side
    }

    pub fn top(&self) -> &CameraState {
        &self.top
    }

    pub fn camera(&self, role: Role) -> &CameraState {
        match role {
            Role::Front => &self.front,
            Role::Side => &self.side,
            Role::Top => &self.top,
        }
    }

    /// Evaluates a triplet against every camera without committing anything.
    pub fn inspect(&self, front: &Grid, side: &Grid, top: &Grid) -> Result<RigVerdict, IntakeError> {
        let frame_for = |role: Role| match role {
            Role::Front => front,
            Role::Side => side,
            Role::Top => top,
        };

        let mut verdicts = Role::INTAKE_ORDER.map(|role| (role, Verdict::Accept));
        for (role, verdict) in verdicts.iter_mut() {
            *verdict = self
                .camera(*role)
                .evaluate(frame_for(*role))
                .map_err(|source| IntakeError::Grid { role: *role, source })?;
        }
        Ok(RigVerdict { verdicts })
    }

    /// Feeds a triplet of frames to the cameras. Either all three frames are
    /// archived, or none is and the first rejection in intake order is returned.
    ///
    /// An all-dark lateral frame equals every translation of itself, so a rig built
    /// from an empty yard rejects even an unchanged triplet with a side camera
    /// `ShiftDetected`.
    pub fn intake(&mut self, front: Grid, side: Grid, top: Grid) -> Result<(), IntakeError> {
        let verdict = self.inspect(&front, &side, &top)?;
        if let Some((role, rejection)) = verdict.first_rejection() {
            warn!("rig intake rejected by {role} camera: {rejection}");
            return Err(IntakeError::Rejected {
                role,
                rejection: rejection.clone(),
            });
        }

        self.side.commit(side);
        self.front.commit(front);
        self.top.commit(top);
        Ok(())
    }
}

/// Staged construction of a `RigView` from a yard height map.
///
/// The maximum height has to be supplied before the height map. The order is
/// recorded and checked, together with every other field, in `build`.
#[derive(Debug, Clone)]
pub struct RigBuilder {
    max_height: Option<i32>,
    height_map: Option<Vec<Vec<i32>>>,
    change_tolerance: usize,
    map_before_bound: bool,
}

impl Default for RigBuilder {
    fn default() -> Self {
        Self {
            max_height: None,
            height_map: None,
            change_tolerance: DEFAULT_CHANGE_TOLERANCE,
            map_before_bound: false,
        }
    }
}

impl RigBuilder {
    /// Seeds the builder with the bound and tolerance of a config.
    pub fn from_config(config: &RigConfig) -> Self {
        Self::default()
            .max_height(config.max_height)
            .change_tolerance(config.change_tolerance)
    }

    pub fn max_height(mut self, max_height: i32) -> Self {
        self.max_height = Some(max_height);
        self
    }

    /// The stack height at every position of the yard, row by row.
    pub fn height_map(mut self, height_map: Vec<Vec<i32>>) -> Self {
        if self.max_height.is_none() {
            self.map_before_bound = true;
        }
        self.height_map = Some(height_map);
        self
    }

    pub fn change_tolerance(mut self, cells: usize) -> Self {
        self.change_tolerance = cells;
        self
    }

    pub fn build(self) -> Result<RigView, BuildError> {
        if self.map_before_bound {
            return Err(BuildError::OrderingViolation);
        }
        let max_height = self.max_height.ok_or(BuildError::MissingField("max_height"))?;
        let height_map = self.height_map.ok_or(BuildError::MissingField("height_map"))?;

        let views = silhouette::project(&height_map, max_height)?;
        let camera = |role: Role, frame: Grid| {
            CameraState::builder()
                .bootstrap(frame)
                .orientation(role.orientation())
                .change_tolerance(self.change_tolerance)
                .build()
        };

        let rig = RigView {
            front: camera(Role::Front, views.front)?,
            side: camera(Role::Side, views.side)?,
            top: camera(Role::Top, views.top)?,
        };
        info!(
            "rig built for a {}x{} yard, max height {max_height}",
            rig.top.reference().rows(),
            rig.top.reference().cols()
        );
        Ok(rig)
    }
}
