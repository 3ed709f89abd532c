//! Legend (clue) generation from solution grids.
//!
//! A legend is derived once per puzzle load from the immutable
//! solution; the player grid never participates. Each line's clue
//! sequence lists its runs of consecutive filled cells, and every line
//! is padded with `None` up to the longest line of its orientation so
//! the presentation layer can lay the whole legend out as one
//! rectangular block.

use crate::grid::Solution;
use serde::Serialize;

/// A complete clue set for one orientation, flattened row-major into a
/// `width * height` block.
///
/// For column clues ([`Legend::horizontal`]) the block is `height` rows
/// of `width` columns sitting above the board, shorter columns padded
/// at the top. For row clues ([`Legend::vertical`]) it is one row of
/// clues per board row, shorter rows padded at the left.
///
/// Invariant: for every line, the run sum plus one gap between
/// consecutive runs never exceeds the corresponding grid dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Legend {
    #[serde(rename = "legend")]
    pub cells: Vec<Option<u32>>,
    pub width: usize,
    pub height: usize,
}

enum Orientation {
    Columns,
    Rows,
}

impl Legend {
    /// Column clues: scan each column top to bottom.
    pub fn horizontal(solution: &Solution) -> Legend {
        let mut lines = Vec::with_capacity(solution.width());
        for x in 0..solution.width() {
            let mut runs = Vec::new();
            let mut sum = 0u32;
            for y in 0..solution.height() {
                if solution.filled_at(x, y) {
                    sum += 1;
                } else if sum > 0 {
                    runs.push(sum);
                    sum = 0;
                }
            }
            if sum > 0 {
                runs.push(sum);
            }
            lines.push(runs);
        }
        Self::flatten(lines, Orientation::Columns)
    }

    /// Row clues: scan each row left to right.
    pub fn vertical(solution: &Solution) -> Legend {
        let mut lines = Vec::with_capacity(solution.height());
        for y in 0..solution.height() {
            let mut runs = Vec::new();
            let mut sum = 0u32;
            for x in 0..solution.width() {
                if solution.filled_at(x, y) {
                    sum += 1;
                } else if sum > 0 {
                    runs.push(sum);
                    sum = 0;
                }
            }
            if sum > 0 {
                runs.push(sum);
            }
            lines.push(runs);
        }
        Self::flatten(lines, Orientation::Rows)
    }

    /// The clue at block position (x, y), `None` for padding.
    pub fn at(&self, x: usize, y: usize) -> Option<u32> {
        self.cells.get(y * self.width + x).copied().flatten()
    }

    fn flatten(lines: Vec<Vec<u32>>, orientation: Orientation) -> Legend {
        let max = lines.iter().map(|line| line.len()).max().unwrap_or(0);

        // Left/top-pad every shorter line with None up to max.
        let padded: Vec<Vec<Option<u32>>> = lines
            .iter()
            .map(|line| {
                let mut out = vec![None; max - line.len()];
                out.extend(line.iter().copied().map(Some));
                out
            })
            .collect();

        match orientation {
            // One block column per board column, emitted row by row.
            Orientation::Columns => {
                let mut cells = Vec::with_capacity(max * padded.len());
                for row in 0..max {
                    for line in &padded {
                        cells.push(line[row]);
                    }
                }
                Legend {
                    cells,
                    width: lines.len(),
                    height: max,
                }
            }
            // One block row per board row.
            Orientation::Rows => {
                let cells = padded.into_iter().flatten().collect();
                Legend {
                    cells,
                    width: max,
                    height: lines.len(),
                }
            }
        }
    }
}
