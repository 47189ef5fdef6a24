// THEORY:
// The `Grid` module holds the most fundamental unit of the monitoring engine: a
// binarized camera frame. Like a raw pixel buffer it is a "dumb" data container.
// It knows its own shape and how to hand out rows and cells, but it does not know
// how to compare itself to another frame; that belongs to `frame_comparator`.
//
// Key architectural principles:
// 1.  **Validated Construction**: A `Grid` can only be built through a factory that
//     checks rectangularity. Once a value exists, every row has the same length.
// 2.  **Immutability**: There is no way to flip a cell in place. Every transform in
//     the engine (shifting, float removal) produces a brand new `Grid`.
// 3.  **Flat Storage**: Cells are stored in a single row-major `Vec<bool>`, the same
//     layout a camera buffer uses, which keeps whole-frame comparisons cache friendly.
// 4.  **Readable Notation**: A frame prints as `{TFF/TTF/TTT}` (rows split by `/`)
//     and parses back from the same text, which keeps logs and tests compact.

pub mod grid {
    use crate::error::GridError;
    use std::fmt;
    use std::str::FromStr;

    /// An immutable, rectangular matrix of binarized pixels.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    #[cfg_attr(
        feature = "serde",
        derive(serde::Serialize, serde::Deserialize),
        serde(try_from = "Vec<Vec<bool>>", into = "Vec<Vec<bool>>")
    )]
    pub struct Grid {
        /// Number of rows in the frame.
        rows: usize,
        /// Number of cells in every row.
        cols: usize,
        /// Row-major cell storage, `rows * cols` long.
        cells: Vec<bool>,
    }

    impl Grid {
        /// Builds a grid from a list of rows, failing if the rows differ in length.
        pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, GridError> {
            let cols = rows.first().map_or(0, Vec::len);
            if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != cols) {
                return Err(GridError::InvalidGrid(format!(
                    "row {index} has {} cells, expected {cols}",
                    row.len()
                )));
            }
            let row_count = rows.len();
            let cells = rows.into_iter().flatten().collect();
            Ok(Self {
                rows: row_count,
                cols,
                cells,
            })
        }

        /// Builds a grid from flat row-major storage.
        pub fn from_cells(rows: usize, cols: usize, cells: Vec<bool>) -> Result<Self, GridError> {
            if cells.len() != rows * cols {
                return Err(GridError::InvalidGrid(format!(
                    "{} cells cannot fill a {rows}x{cols} grid",
                    cells.len()
                )));
            }
            Ok(Self { rows, cols, cells })
        }

        /// A grid with every cell set to `value`.
        pub fn filled(rows: usize, cols: usize, value: bool) -> Self {
            Self {
                rows,
                cols,
                cells: vec![value; rows * cols],
            }
        }

        /// A grid whose cell `(r, c)` is `f(r, c)`.
        pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
            let mut cells = Vec::with_capacity(rows * cols);
            for r in 0..rows {
                for c in 0..cols {
                    cells.push(f(r, c));
                }
            }
            Self { rows, cols, cells }
        }

        pub fn rows(&self) -> usize {
            self.rows
        }

        pub fn cols(&self) -> usize {
            self.cols
        }

        /// `(rows, cols)`.
        pub fn dimensions(&self) -> (usize, usize) {
            (self.rows, self.cols)
        }

        pub fn same_shape(&self, other: &Grid) -> bool {
            self.dimensions() == other.dimensions()
        }

        /// The cell at `(row, col)`, or `None` outside the frame.
        pub fn get(&self, row: usize, col: usize) -> Option<bool> {
            if row < self.rows && col < self.cols {
                Some(self.cells[row * self.cols + col])
            } else {
                None
            }
        }

        pub fn row(&self, row: usize) -> Option<&[bool]> {
            (row < self.rows).then(|| &self.cells[row * self.cols..(row + 1) * self.cols])
        }

        /// Iterates over the rows top to bottom.
        pub fn iter_rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
            (0..self.rows).map(move |r| &self.cells[r * self.cols..(r + 1) * self.cols])
        }

        /// The flat, row-major cell storage.
        pub fn cells(&self) -> &[bool] {
            &self.cells
        }

        /// Number of lit (`true`) cells.
        pub fn count_lit(&self) -> usize {
            self.cells.iter().filter(|&&cell| cell).count()
        }

        pub fn to_rows(&self) -> Vec<Vec<bool>> {
            self.iter_rows().map(<[bool]>::to_vec).collect()
        }
    }

    impl TryFrom<Vec<Vec<bool>>> for Grid {
        type Error = GridError;

        fn try_from(rows: Vec<Vec<bool>>) -> Result<Self, Self::Error> {
            Grid::from_rows(rows)
        }
    }

    impl From<Grid> for Vec<Vec<bool>> {
        fn from(grid: Grid) -> Self {
            grid.to_rows()
        }
    }

    impl fmt::Display for Grid {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("{")?;
            for (index, row) in self.iter_rows().enumerate() {
                if index > 0 {
                    f.write_str("/")?;
                }
                for &cell in row {
                    f.write_str(if cell { "T" } else { "F" })?;
                }
            }
            f.write_str("}")
        }
    }

    impl FromStr for Grid {
        type Err = GridError;

        /// Parses the `{TFF/TTF}` notation. Braces and surrounding whitespace are optional.
        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let body = s.trim();
            let body = body
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix('}'))
                .unwrap_or(body)
                .trim();
            if body.is_empty() {
                return Ok(Grid::filled(0, 0, false));
            }

            let rows = body
                .split('/')
                .map(|row| {
                    row.trim()
                        .chars()
                        .map(|ch| match ch {
                            'T' | 't' | '1' => Ok(true),
                            'F' | 'f' | '0' => Ok(false),
                            other => Err(GridError::InvalidGrid(format!("unexpected cell `{other}`"))),
                        })
                        .collect::<Result<Vec<bool>, GridError>>()
                })
                .collect::<Result<Vec<Vec<bool>>, GridError>>()?;
            Grid::from_rows(rows)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::grid::*;
    use crate::error::GridError;

    #[test]
    fn from_rows_keeps_row_major_layout() {
        let g = Grid::from_rows(vec![vec![true, false, false], vec![true, true, false]]).unwrap();
        assert_eq!(g.dimensions(), (2, 3));
        assert_eq!(g.get(0, 0), Some(true));
        assert_eq!(g.get(1, 1), Some(true));
        assert_eq!(g.get(1, 2), Some(false));
        assert_eq!(g.get(2, 0), None);
        assert_eq!(g.row(1), Some(&[true, true, false][..]));
        assert_eq!(g.count_lit(), 3);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Grid::from_rows(vec![vec![true, false], vec![true]]).unwrap_err();
        assert!(matches!(err, GridError::InvalidGrid(_)));
    }

    #[test]
    fn from_cells_checks_length() {
        assert!(Grid::from_cells(2, 2, vec![true; 4]).is_ok());
        assert!(matches!(
            Grid::from_cells(2, 2, vec![true; 3]),
            Err(GridError::InvalidGrid(_))
        ));
    }

    #[test]
    fn zero_width_rows_are_representable() {
        let g = Grid::from_rows(vec![vec![], vec![]]).unwrap();
        assert_eq!(g.dimensions(), (2, 0));
        assert_eq!(g.iter_rows().count(), 2);
        assert_eq!(g.to_string(), "{/}");
    }

    #[test]
    fn notation_round_trips() {
        let text = "{TFF/TTF/TTT}";
        let g: Grid = text.parse().unwrap();
        assert_eq!(g.dimensions(), (3, 3));
        assert_eq!(g.to_string(), text);
        assert_eq!("TFF / TTF / TTT".parse::<Grid>().unwrap(), g);
    }

    #[test]
    fn notation_rejects_unknown_cells() {
        assert!(matches!("{TX/TT}".parse::<Grid>(), Err(GridError::InvalidGrid(_))));
        assert!(matches!("{TT/T}".parse::<Grid>(), Err(GridError::InvalidGrid(_))));
    }

    #[test]
    fn equality_is_structural() {
        let a: Grid = "{TF/TT}".parse().unwrap();
        let b = Grid::from_rows(vec![vec![true, false], vec![true, true]]).unwrap();
        let c: Grid = "{TF/TF}".parse().unwrap();
        let d: Grid = "{TFT}".parse().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }
}
