pub mod camera_state;
pub mod frame_comparator;
pub mod grid;
pub mod silhouette;
pub mod utils;
