// THEORY:
// The `FrameComparator` is the analytical engine of the monitoring system. Where
// `Grid` is a dumb container, this module knows how to relate two frames to each
// other. It is a stateless utility: every function takes frames in and hands new
// values out, and none of them remember anything between calls.
//
// Key architectural principles & algorithm steps:
// 1.  **Pixel Difference**: `count_differences` is the primary "did anything move?"
//     signal. It refuses to compare frames of different shape instead of silently
//     truncating, because a shape change means the camera itself was swapped.
// 2.  **Rigid Translation**: `shift_rows` / `shift_cols` translate a frame while
//     dropping whatever slides off the edge. Lost cells never come back.
// 3.  **Shift Search**: `find_shift` brute-forces every translation whose overlap
//     with the original frame is non-empty. Camera resolution is coarse, so the
//     O(R^2 * C^2) search is affordable, and it exits on the first exact match.
//     The zero translation is never a shift; it just means "nothing changed".
// 4.  **Gravity Filter**: `remove_float` treats column 0 of each row as the ground
//     contact side of a lateral silhouette. Only the leading run of lit cells is
//     grounded; anything lit after the first gap is floating and is discarded.

use crate::core_modules::grid::grid::Grid;
use crate::error::GridError;
use std::fmt;

/// A rigid translation of a frame. Positive values move content down / right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shift {
    pub rows: isize,
    pub cols: isize,
}

impl Shift {
    pub fn new(rows: isize, cols: isize) -> Self {
        Self { rows, cols }
    }

    pub fn is_zero(&self) -> bool {
        self.rows == 0 && self.cols == 0
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:+} rows, {:+} cols)", self.rows, self.cols)
    }
}

pub mod frame_comparator {
    use super::*; // Make Grid, Shift and GridError available.

    /// Counts the cells that differ between two frames of identical shape.
    pub fn count_differences(a: &Grid, b: &Grid) -> Result<usize, GridError> {
        ensure_same_shape(a, b)?;
        Ok(a.cells()
            .iter()
            .zip(b.cells())
            .filter(|(left, right)| left != right)
            .count())
    }

    /// Moves every row down by `k` (up when negative). Rows that slide in from
    /// outside the frame are all-false.
    pub fn shift_rows(grid: &Grid, k: isize) -> Grid {
        Grid::from_fn(grid.rows(), grid.cols(), |r, c| {
            source_index(r, k, grid.rows())
                .and_then(|src| grid.get(src, c))
                .unwrap_or(false)
        })
    }

    /// Moves every column right by `k` (left when negative), row by row.
    pub fn shift_cols(grid: &Grid, k: isize) -> Grid {
        Grid::from_fn(grid.rows(), grid.cols(), |r, c| {
            source_index(c, k, grid.cols())
                .and_then(|src| grid.get(r, src))
                .unwrap_or(false)
        })
    }

    /// True iff `after` is exactly `before` translated by a non-zero `(row_shift, col_shift)`.
    ///
    /// Equivalent to comparing `after` with `shift_cols(shift_rows(before, row_shift), col_shift)`,
    /// but reads cells in place instead of building the translated frame.
    pub fn is_shifted_by(before: &Grid, after: &Grid, row_shift: isize, col_shift: isize) -> bool {
        if (row_shift == 0 && col_shift == 0) || !before.same_shape(after) {
            return false;
        }
        let (rows, cols) = before.dimensions();
        for r in 0..rows {
            let src_row = source_index(r, row_shift, rows);
            for c in 0..cols {
                let expected = src_row
                    .zip(source_index(c, col_shift, cols))
                    .and_then(|(sr, sc)| before.get(sr, sc))
                    .unwrap_or(false);
                if after.get(r, c) != Some(expected) {
                    return false;
                }
            }
        }
        true
    }

    /// Searches every translation with a non-empty overlap and returns the first one
    /// that maps `before` exactly onto `after`. Row shifts form the outer loop, both
    /// ranges run from most negative to most positive.
    pub fn find_shift(before: &Grid, after: &Grid) -> Result<Option<Shift>, GridError> {
        ensure_same_shape(before, after)?;
        let rows = before.rows() as isize;
        let cols = before.cols() as isize;

        for row_shift in (-rows + 1)..rows {
            for col_shift in (-cols + 1)..cols {
                if is_shifted_by(before, after, row_shift, col_shift) {
                    return Ok(Some(Shift::new(row_shift, col_shift)));
                }
            }
        }
        Ok(None)
    }

    /// True iff some non-zero rigid translation of `before` reproduces `after` exactly.
    pub fn is_shifted(before: &Grid, after: &Grid) -> Result<bool, GridError> {
        Ok(find_shift(before, after)?.is_some())
    }

    /// Collapses every row to its grounded run: the lit cells contiguous with column 0.
    pub fn remove_float(grid: &Grid) -> Grid {
        let grounded: Vec<usize> = grid
            .iter_rows()
            .map(|row| row.iter().take_while(|&&cell| cell).count())
            .collect();
        Grid::from_fn(grid.rows(), grid.cols(), |r, c| c < grounded[r])
    }

    /// Index in the source frame that lands on `index` after moving by `k`.
    fn source_index(index: usize, k: isize, len: usize) -> Option<usize> {
        let src = index as isize - k;
        (src >= 0 && src < len as isize).then_some(src as usize)
    }

    fn ensure_same_shape(a: &Grid, b: &Grid) -> Result<(), GridError> {
        if a.same_shape(b) {
            Ok(())
        } else {
            Err(GridError::DimensionMismatch {
                expected: a.dimensions(),
                found: b.dimensions(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::frame_comparator::*;
    use super::Shift;
    use crate::core_modules::grid::grid::Grid;
    use crate::error::GridError;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn g(text: &str) -> Grid {
        text.parse().expect("test grid notation")
    }

    fn random_grid(rng: &mut StdRng, rows: usize, cols: usize) -> Grid {
        Grid::from_fn(rows, cols, |_, _| rng.random_bool(0.5))
    }

    #[test]
    fn shift_cols_moves_content_right() {
        let s = g("{TTT/TFF/TTF}");
        assert_eq!(shift_cols(&s, 1), g("{FTT/FTF/FTT}"));
    }

    #[test]
    fn shift_rows_moves_content_down() {
        let s = g("{TTT/TFF/TTF}");
        assert_eq!(shift_rows(&s, 1), g("{FFF/TTT/TFF}"));
    }

    #[test]
    fn shifting_back_does_not_recover_lost_rows() {
        let full = Grid::filled(3, 3, true);
        let restored = shift_rows(&shift_rows(&full, 1), -1);
        assert_ne!(restored, full);
        assert_eq!(restored, g("{TTT/TTT/FFF}"));

        let restored = shift_cols(&shift_cols(&full, 2), -2);
        assert_eq!(restored, g("{TFF/TFF/TFF}"));
    }

    #[test]
    fn count_differences_counts_mismatched_cells() {
        let a = g("{TFF/TTF/TTT}");
        let b = g("{TTF/TTF/FTT}");
        assert_eq!(count_differences(&a, &b).unwrap(), 2);
        assert_eq!(count_differences(&a, &a).unwrap(), 0);
    }

    #[test]
    fn count_differences_rejects_mismatched_shapes() {
        let err = count_differences(&g("{TF/TT}"), &g("{TFF/TTF}")).unwrap_err();
        assert_eq!(
            err,
            GridError::DimensionMismatch {
                expected: (2, 2),
                found: (2, 3)
            }
        );
    }

    #[test]
    fn unrelated_frame_is_not_a_shift() {
        let before = g("{TFF/TTF/TTT}");
        let after = g("{TTF/TTT/FFT}");
        assert!(!is_shifted(&before, &after).unwrap());
    }

    #[test]
    fn identical_frame_is_not_a_shift() {
        let before = g("{TFF/TTF/TTT}");
        assert!(!is_shifted(&before, &before).unwrap());
        assert!(!is_shifted_by(&before, &before, 0, 0));
    }

    #[test]
    fn dark_frame_matches_every_translation() {
        let dark = Grid::filled(2, 2, false);
        assert_eq!(find_shift(&dark, &dark).unwrap(), Some(Shift::new(-1, -1)));
    }

    #[test]
    fn detects_column_shift_left() {
        let before = g("{TFFFF/TTTFF/TTTTF}");
        let after = g("{FFFFF/TFFFF/TTFFF}");
        assert_eq!(find_shift(&before, &after).unwrap(), Some(Shift::new(0, -2)));
    }

    #[test]
    fn detects_column_shift_right() {
        let before = g("{TFFFF/TTTFF/TTTTF}");
        let after = g("{FFFFT/FFFFT/FFFFT}");
        assert_eq!(find_shift(&before, &after).unwrap(), Some(Shift::new(0, 4)));
    }

    #[test]
    fn detects_row_shift_down() {
        let before = g("{TFFF/TTTF/TTTT/FTFT}");
        let after = g("{FFFF/FFFF/TFFF/TTTF}");
        assert_eq!(find_shift(&before, &after).unwrap(), Some(Shift::new(2, 0)));
    }

    #[test]
    fn detects_row_shift_up() {
        let before = g("{TFFF/TTTF/TTTT/FTFT}");
        let after = g("{TTTF/TTTT/FTFT/FFFF}");
        assert!(is_shifted(&before, &after).unwrap());
        assert!(is_shifted_by(&before, &after, -1, 0));
    }

    #[test]
    fn detects_diagonal_shift() {
        let before = g("{TFFF/FTTF/TTTF/FTFT}");
        let after = g("{TTFF/TTFF/TFTF/FFFF}");
        assert_eq!(find_shift(&before, &after).unwrap(), Some(Shift::new(-1, -1)));
    }

    #[test]
    fn shift_search_requires_matching_shapes() {
        let result = is_shifted(&g("{TF/TT}"), &g("{TF/TT/FF}"));
        assert!(matches!(result, Err(GridError::DimensionMismatch { .. })));
    }

    #[test]
    fn shift_search_on_empty_frames_finds_nothing() {
        let empty = Grid::filled(0, 0, false);
        assert_eq!(find_shift(&empty, &empty).unwrap(), None);
    }

    #[test]
    fn remove_float_drops_cells_after_first_gap() {
        let s = g("{TFT/TTF/FFF}");
        assert_eq!(remove_float(&s), g("{TFF/TTF/FFF}"));
        assert_eq!(remove_float(&g("{FTT/TTT}")), g("{FFF/TTT}"));
    }

    #[test]
    fn randomized_frame_properties() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let rows = rng.random_range(1..6);
            let cols = rng.random_range(1..6);
            let a = random_grid(&mut rng, rows, cols);
            let b = random_grid(&mut rng, rows, cols);

            assert_eq!(count_differences(&a, &a).unwrap(), 0);
            assert_eq!(
                count_differences(&a, &b).unwrap(),
                count_differences(&b, &a).unwrap()
            );
            assert_eq!(count_differences(&a, &b).unwrap() == 0, a == b);

            let filtered = remove_float(&a);
            assert_eq!(remove_float(&filtered), filtered);

            let dr = rng.random_range(-(rows as i64) + 1..rows as i64) as isize;
            let dc = rng.random_range(-(cols as i64) + 1..cols as i64) as isize;
            let materialized = shift_cols(&shift_rows(&a, dr), dc);
            let expected = (dr, dc) != (0, 0) && materialized == b;
            assert_eq!(is_shifted_by(&a, &b, dr, dc), expected);
            assert_eq!(is_shifted_by(&a, &materialized, dr, dc), (dr, dc) != (0, 0));
        }
    }
}
