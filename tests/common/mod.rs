#![allow(dead_code)]

use dock_watch::{Grid, RigView};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parses the `{TFF/TTF}` notation, panicking on malformed test input.
pub fn grid(text: &str) -> Grid {
    text.parse().expect("test grid notation")
}

/// The reference yard: three rows of four stacks, at most five containers high.
pub fn reference_yard() -> Vec<Vec<i32>> {
    vec![vec![1, 2, 3, 4], vec![0, 4, 1, 5], vec![1, 2, 0, 1]]
}

pub fn reference_rig() -> RigView {
    RigView::builder()
        .max_height(5)
        .height_map(reference_yard())
        .build()
        .expect("reference yard is valid")
}

pub fn reference_front() -> Grid {
    grid("{TFFFF/TTTTF/TTTFF/TTTTT}")
}

pub fn reference_side() -> Grid {
    grid("{TTTTF/TTTTT/TTFFF}")
}

pub fn reference_top() -> Grid {
    grid("{TTTT/FTTT/TTFT}")
}
