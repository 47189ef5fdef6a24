// THEORY:
// The `SilhouetteProjector` turns a map of container stack heights into the three
// frames a freshly installed rig would capture. It bridges the yard's logical
// layout and the camera's binarized view, and it supplies the bootstrap frames
// every `CameraState` starts from.
//
// Projection rules, for a height map `m` of `R x C` stacks and a height bound `H`:
// -   **Top**: `R x C`. A cell is lit whenever a stack stands there (`m[r][c] > 0`).
// -   **Front**: one row per map column, `H` levels wide. Row `c` lights the first
//     `max_r m[r][c]` levels, measured from the ground at level 0.
// -   **Side**: one row per map row, `H` levels wide. Row `r` lights the first
//     `max_c m[r][c]` levels.
//
// Lateral rows are grounded at column 0, which is exactly the convention
// `remove_float` relies on when it strips floating artifacts.

use crate::core_modules::grid::grid::Grid;
use crate::error::{BuildError, GridError};

/// The three frames derived from a height map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Silhouettes {
    pub front: Grid,
    pub side: Grid,
    pub top: Grid,
}

/// Checks the height map and projects it onto the front, side and top views.
pub fn project(height_map: &[Vec<i32>], max_height: i32) -> Result<Silhouettes, BuildError> {
    let levels = validate(height_map, max_height)?;
    let rows = height_map.len();
    let cols = height_map.first().map_or(0, Vec::len);

    let column_max: Vec<usize> = (0..cols)
        .map(|c| height_map.iter().map(|row| row[c]).max().unwrap_or(0) as usize)
        .collect();
    let row_max: Vec<usize> = height_map
        .iter()
        .map(|row| row.iter().copied().max().unwrap_or(0) as usize)
        .collect();

    Ok(Silhouettes {
        front: Grid::from_fn(cols, levels, |c, level| level < column_max[c]),
        side: Grid::from_fn(rows, levels, |r, level| level < row_max[r]),
        top: Grid::from_fn(rows, cols, |r, c| height_map[r][c] > 0),
    })
}

/// Validates the bound and every stack height; returns the bound as a level count.
fn validate(height_map: &[Vec<i32>], max_height: i32) -> Result<usize, BuildError> {
    if max_height < 0 {
        return Err(BuildError::InvalidHeight {
            value: max_height,
            reason: "maximum height cannot be negative",
        });
    }

    let cols = height_map.first().map_or(0, Vec::len);
    for (index, row) in height_map.iter().enumerate() {
        if row.len() != cols {
            return Err(GridError::InvalidGrid(format!(
                "height map row {index} has {} stacks, expected {cols}",
                row.len()
            ))
            .into());
        }
        for &stack in row {
            if stack < 0 {
                return Err(BuildError::InvalidHeight {
                    value: stack,
                    reason: "container stack heights cannot be negative",
                });
            }
            if stack > max_height {
                return Err(BuildError::InvalidHeight {
                    value: stack,
                    reason: "container stack heights cannot exceed the maximum height",
                });
            }
        }
    }

    Ok(max_height as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(text: &str) -> Grid {
        text.parse().expect("test grid notation")
    }

    fn yard() -> Vec<Vec<i32>> {
        vec![vec![1, 2, 3, 4], vec![0, 4, 1, 5], vec![1, 2, 0, 1]]
    }

    #[test]
    fn projects_reference_yard() {
        let views = project(&yard(), 5).unwrap();
        assert_eq!(views.front, g("{TFFFF/TTTTF/TTTFF/TTTTT}"));
        assert_eq!(views.side, g("{TTTTF/TTTTT/TTFFF}"));
        assert_eq!(views.top, g("{TTTT/FTTT/TTFT}"));
    }

    #[test]
    fn canvas_is_as_wide_as_the_bound() {
        let views = project(&[vec![2, 0]], 4).unwrap();
        assert_eq!(views.front, g("{TTFF/FFFF}"));
        assert_eq!(views.side, g("{TTFF}"));
        assert_eq!(views.top, g("{TF}"));
    }

    #[test]
    fn zero_bound_yields_zero_width_lateral_views() {
        let views = project(&[vec![0, 0]], 0).unwrap();
        assert_eq!(views.front.dimensions(), (2, 0));
        assert_eq!(views.side.dimensions(), (1, 0));
        assert_eq!(views.top, g("{FF}"));
    }

    #[test]
    fn rejects_out_of_range_heights() {
        assert!(matches!(
            project(&yard(), -1),
            Err(BuildError::InvalidHeight { value: -1, .. })
        ));
        assert!(matches!(
            project(&yard(), 4),
            Err(BuildError::InvalidHeight { value: 5, .. })
        ));
        assert!(matches!(
            project(&[vec![1, -2]], 3),
            Err(BuildError::InvalidHeight { value: -2, .. })
        ));
    }

    #[test]
    fn rejects_ragged_height_map() {
        assert!(matches!(
            project(&[vec![1, 2], vec![1]], 3),
            Err(BuildError::Grid(GridError::InvalidGrid(_)))
        ));
    }
}
