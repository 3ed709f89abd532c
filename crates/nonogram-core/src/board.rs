//! The mutable player grid.

use crate::cell::Cell;
use crate::grid::{GridError, Solution};
use serde::{Deserialize, Serialize};

/// How a click mutates a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Paint: toggles between filled and empty.
    Primary,
    /// Mark: toggles between marked and empty.
    Secondary,
}

/// One cell of the player grid in its persisted shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardCell {
    #[serde(rename = "xCoord")]
    pub x: usize,
    #[serde(rename = "yCoord")]
    pub y: usize,
    pub content: Cell,
}

/// The grid the player edits while solving, parallel to the solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<BoardCell>,
}

impl Board {
    /// A fresh all-empty board with row-major coordinates.
    pub fn new(width: usize, height: usize) -> Board {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(BoardCell {
                    x,
                    y,
                    content: Cell::Empty,
                });
            }
        }
        Board {
            width,
            height,
            cells,
        }
    }

    /// Rebuilds a board from persisted cells, failing fast when the
    /// cell count does not match the declared dimensions.
    pub fn from_cells(
        cells: Vec<BoardCell>,
        width: usize,
        height: usize,
    ) -> Result<Board, GridError> {
        if cells.len() != width * height {
            return Err(GridError::DimensionMismatch {
                expected: width * height,
                actual: cells.len(),
            });
        }
        Ok(Board {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The persisted shape: a flat array of `{xCoord, yCoord, content}`.
    pub fn cells(&self) -> &[BoardCell] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).map(|c| c.content)
    }

    /// Flat index for (x, y), `None` when outside the grid.
    pub fn index_of(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// Applies a toggle. Returns false for an out-of-range index, in
    /// which case the board is untouched.
    ///
    /// Primary maps filled back to empty and anything else (including a
    /// marked cell) to filled; secondary is the mirror image for marks.
    pub fn toggle(&mut self, index: usize, intent: Intent) -> bool {
        let Some(cell) = self.cells.get_mut(index) else {
            return false;
        };
        cell.content = match (intent, cell.content) {
            (Intent::Primary, Cell::Filled) => Cell::Empty,
            (Intent::Primary, _) => Cell::Filled,
            (Intent::Secondary, Cell::Marked) => Cell::Empty,
            (Intent::Secondary, _) => Cell::Marked,
        };
        true
    }

    /// Overwrites a cell's content. Returns false out of range.
    pub fn set(&mut self, index: usize, content: Cell) -> bool {
        match self.cells.get_mut(index) {
            Some(cell) => {
                cell.content = content;
                true
            }
            None => false,
        }
    }

    /// Win iff every cell, with marks normalized to empty, agrees with
    /// the solution about being filled.
    pub fn check_win(&self, solution: &Solution) -> bool {
        if self.cells.len() != solution.len() {
            return false;
        }
        self.cells
            .iter()
            .enumerate()
            .all(|(i, cell)| (cell.content.normalized() == Cell::Filled) == solution.filled(i))
    }

    /// Converts residual marks to empty (cosmetic cleanup after a win).
    pub fn normalize_marks(&mut self) {
        for cell in &mut self.cells {
            if cell.content == Cell::Marked {
                cell.content = Cell::Empty;
            }
        }
    }

    /// Indices where the solution is filled but the player has not
    /// painted the cell yet. The hint draw picks uniformly from this
    /// set; an already-solved or all-empty puzzle yields no candidates.
    pub fn hint_candidates(&self, solution: &Solution) -> Vec<usize> {
        (0..self.cells.len().min(solution.len()))
            .filter(|&i| solution.filled(i) && self.cells[i].content != Cell::Filled)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution(cells: &[u8], width: usize, height: usize) -> Solution {
        Solution::new(cells.iter().map(|&c| c == 1).collect(), width, height).unwrap()
    }

    #[test]
    fn test_new_board_is_empty_with_row_major_coords() {
        let board = Board::new(3, 2);
        assert_eq!(board.len(), 6);
        assert_eq!(board.cells()[0], BoardCell { x: 0, y: 0, content: Cell::Empty });
        assert_eq!(board.cells()[4], BoardCell { x: 1, y: 1, content: Cell::Empty });
    }

    #[test]
    fn test_primary_toggle_cycle() {
        let mut board = Board::new(2, 2);
        assert!(board.toggle(0, Intent::Primary));
        assert_eq!(board.get(0), Some(Cell::Filled));
        assert!(board.toggle(0, Intent::Primary));
        assert_eq!(board.get(0), Some(Cell::Empty));
    }

    #[test]
    fn test_secondary_toggle_cycle() {
        let mut board = Board::new(2, 2);
        assert!(board.toggle(3, Intent::Secondary));
        assert_eq!(board.get(3), Some(Cell::Marked));
        assert!(board.toggle(3, Intent::Secondary));
        assert_eq!(board.get(3), Some(Cell::Empty));
    }

    #[test]
    fn test_primary_overwrites_mark() {
        let mut board = Board::new(2, 1);
        board.toggle(0, Intent::Secondary);
        board.toggle(0, Intent::Primary);
        assert_eq!(board.get(0), Some(Cell::Filled));

        board.toggle(1, Intent::Primary);
        board.toggle(1, Intent::Secondary);
        assert_eq!(board.get(1), Some(Cell::Marked));
    }

    #[test]
    fn test_out_of_range_toggle_is_a_no_op() {
        let mut board = Board::new(2, 2);
        let before = board.clone();
        assert!(!board.toggle(4, Intent::Primary));
        assert_eq!(board, before);
    }

    #[test]
    fn test_check_win_exact_match() {
        let s = solution(&[1, 0, 0, 1], 2, 2);
        let mut board = Board::new(2, 2);
        board.toggle(0, Intent::Primary);
        board.toggle(3, Intent::Primary);
        assert!(board.check_win(&s));
    }

    #[test]
    fn test_check_win_normalizes_marks_on_empty_cells() {
        let s = solution(&[1, 0, 0, 1], 2, 2);
        let mut board = Board::new(2, 2);
        board.toggle(0, Intent::Primary);
        board.toggle(3, Intent::Primary);
        // A mark where the solution is empty still wins.
        board.toggle(1, Intent::Secondary);
        assert!(board.check_win(&s));
    }

    #[test]
    fn test_marked_solution_cell_is_not_a_win() {
        let s = solution(&[1, 0, 0, 1], 2, 2);
        let mut board = Board::new(2, 2);
        // Marking a cell the solution fills counts as empty, not filled.
        board.toggle(0, Intent::Secondary);
        board.toggle(3, Intent::Primary);
        assert!(!board.check_win(&s));
    }

    #[test]
    fn test_missing_fill_is_not_a_win() {
        let s = solution(&[1, 0, 0, 1], 2, 2);
        let mut board = Board::new(2, 2);
        board.toggle(3, Intent::Primary);
        assert!(!board.check_win(&s));
    }

    #[test]
    fn test_normalize_marks() {
        let mut board = Board::new(2, 1);
        board.toggle(0, Intent::Secondary);
        board.toggle(1, Intent::Primary);
        board.normalize_marks();
        assert_eq!(board.get(0), Some(Cell::Empty));
        assert_eq!(board.get(1), Some(Cell::Filled));
    }

    #[test]
    fn test_hint_candidates_skip_correct_fills() {
        let s = solution(&[1, 0, 1, 1], 2, 2);
        let mut board = Board::new(2, 2);
        board.toggle(0, Intent::Primary);
        board.toggle(2, Intent::Secondary);
        assert_eq!(board.hint_candidates(&s), vec![2, 3]);
    }

    #[test]
    fn test_hint_candidates_empty_for_blank_solution() {
        let s = solution(&[0, 0, 0, 0], 2, 2);
        let board = Board::new(2, 2);
        assert!(board.hint_candidates(&s).is_empty());
    }

    #[test]
    fn test_persisted_shape_round_trip() {
        let mut board = Board::new(2, 2);
        board.toggle(1, Intent::Primary);
        board.toggle(2, Intent::Secondary);

        let json = serde_json::to_string(board.cells()).unwrap();
        assert!(json.contains(r#""xCoord":1"#));
        assert!(json.contains(r#""content":"X""#));

        let cells: Vec<BoardCell> = serde_json::from_str(&json).unwrap();
        let restored = Board::from_cells(cells, 2, 2).unwrap();
        assert_eq!(restored, board);
    }

    #[test]
    fn test_from_cells_rejects_wrong_length() {
        let cells = Board::new(2, 2).cells().to_vec();
        assert!(Board::from_cells(cells, 3, 2).is_err());
    }
}
