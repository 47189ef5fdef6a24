// THEORY:
// This file is the main entry point for the `dock_watch` library crate. It follows
// the standard Rust convention of using `lib.rs` to define the public API exposed
// to hosts that feed camera frames into the engine.
//
// The primary interface is the `RigView` (three cameras on one yard) built from a
// height map, plus `RigMonitor` for hosts that share a rig between tasks. The
// analytical building blocks (`Grid`, the frame comparator, the per-camera state
// machine) live in `core_modules` and are public so they can be used on their own.

pub mod core_modules;
pub mod error;
pub mod monitor;
pub mod rig;

pub use crate::core_modules::camera_state::{CameraState, IngestOutcome, Orientation, Rejection, Verdict};
pub use crate::core_modules::frame_comparator::Shift;
pub use crate::core_modules::grid::grid::Grid;
pub use crate::monitor::RigMonitor;
pub use crate::rig::{RigBuilder, RigConfig, RigView, Role};
