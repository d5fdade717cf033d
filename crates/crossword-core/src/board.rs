use crate::puzzle::{Position, Puzzle};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One cell of the player's fill grid.
///
/// Serialized as `null` (blocked), `""` (empty), or a one-character string,
/// the shape saved sessions use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Blocked,
    Empty,
    Filled(char),
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Blocked => serializer.serialize_none(),
            Cell::Empty => serializer.serialize_str(""),
            Cell::Filled(c) => serializer.serialize_str(c.encode_utf8(&mut [0; 4])),
        }
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        match value {
            None => Ok(Cell::Blocked),
            Some(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (None, _) => Ok(Cell::Empty),
                    (Some(c), None) => Ok(Cell::Filled(c)),
                    _ => Err(D::Error::custom("cell value must be a single character")),
                }
            }
        }
    }
}

/// The player's mutable fill grid. Blocked positions mirror the puzzle's
/// blocked positions exactly and never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Vec<Vec<Cell>>,
}

impl Board {
    /// A fresh board for `puzzle`: every open cell empty.
    pub fn fresh(puzzle: &Puzzle) -> Self {
        let cells = (0..puzzle.height())
            .map(|row| {
                (0..puzzle.width())
                    .map(|col| {
                        if puzzle.is_open(Position::new(row, col)) {
                            Cell::Empty
                        } else {
                            Cell::Blocked
                        }
                    })
                    .collect()
            })
            .collect();
        Self { cells }
    }

    /// Rebuild a board from a saved session grid.
    ///
    /// Returns `None` if the grid's shape or blocked-cell pattern does not
    /// mirror the puzzle; a malformed session degrades to a fresh board.
    pub fn from_saved(cells: Vec<Vec<Cell>>, puzzle: &Puzzle) -> Option<Self> {
        if cells.len() != puzzle.height() || cells.iter().any(|row| row.len() != puzzle.width()) {
            return None;
        }
        for (row, row_cells) in cells.iter().enumerate() {
            for (col, &cell) in row_cells.iter().enumerate() {
                let open = puzzle.is_open(Position::new(row, col));
                if open == (cell == Cell::Blocked) {
                    return None;
                }
            }
        }
        Some(Self { cells })
    }

    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.row][pos.col]
    }

    /// Write an open cell.
    ///
    /// Precondition: `value` is not `Blocked` and `pos` is an open cell. The
    /// controller's own bounds checks keep both.
    pub fn set(&mut self, pos: Position, value: Cell) {
        debug_assert!(value != Cell::Blocked, "cannot write a blocked value");
        debug_assert!(
            self.cells[pos.row][pos.col] != Cell::Blocked,
            "cannot write to a blocked position"
        );
        self.cells[pos.row][pos.col] = value;
    }

    /// True when no open cell is empty.
    pub fn is_filled(&self) -> bool {
        self.cells
            .iter()
            .flatten()
            .all(|&cell| cell != Cell::Empty)
    }

    /// True when every open cell case-exactly matches the solution.
    pub fn is_filled_correctly(&self, puzzle: &Puzzle) -> bool {
        self.cells.iter().enumerate().all(|(row, row_cells)| {
            row_cells.iter().enumerate().all(|(col, &cell)| {
                match puzzle.solution(Position::new(row, col)) {
                    None => true,
                    Some(expected) => cell == Cell::Filled(expected),
                }
            })
        })
    }

    /// Case-insensitive correctness check for one cell; an empty cell is
    /// never correct.
    pub fn is_cell_correct(&self, pos: Position, puzzle: &Puzzle) -> bool {
        match (self.get(pos), puzzle.solution(pos)) {
            (Cell::Filled(c), Some(expected)) => c.eq_ignore_ascii_case(&expected),
            _ => false,
        }
    }

    pub fn cells(&self) -> &[Vec<Cell>] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_all_correct(board: &mut Board, puzzle: &Puzzle) {
        for row in 0..puzzle.height() {
            for col in 0..puzzle.width() {
                let pos = Position::new(row, col);
                if let Some(c) = puzzle.solution(pos) {
                    board.set(pos, Cell::Filled(c));
                }
            }
        }
    }

    #[test]
    fn test_fresh_mirrors_blocked_cells() {
        let puzzle = Puzzle::sample();
        let board = Board::fresh(&puzzle);
        assert_eq!(board.get(Position::new(0, 4)), Cell::Blocked);
        assert_eq!(board.get(Position::new(4, 0)), Cell::Blocked);
        assert_eq!(board.get(Position::new(0, 0)), Cell::Empty);
        assert!(!board.is_filled());
    }

    #[test]
    fn test_is_filled_correctly_implies_is_filled() {
        let puzzle = Puzzle::sample();
        let mut board = Board::fresh(&puzzle);
        fill_all_correct(&mut board, &puzzle);
        assert!(board.is_filled());
        assert!(board.is_filled_correctly(&puzzle));

        // One wrong letter keeps the board filled but no longer correct.
        board.set(Position::new(0, 0), Cell::Filled('X'));
        assert!(board.is_filled());
        assert!(!board.is_filled_correctly(&puzzle));
    }

    #[test]
    fn test_is_filled_correctly_is_case_exact() {
        let puzzle = Puzzle::sample();
        let mut board = Board::fresh(&puzzle);
        fill_all_correct(&mut board, &puzzle);
        board.set(Position::new(0, 0), Cell::Filled('c'));
        assert!(!board.is_filled_correctly(&puzzle));
        // But the per-cell check used for auto-check is case-insensitive.
        assert!(board.is_cell_correct(Position::new(0, 0), &puzzle));
    }

    #[test]
    fn test_is_cell_correct_false_when_empty() {
        let puzzle = Puzzle::sample();
        let board = Board::fresh(&puzzle);
        assert!(!board.is_cell_correct(Position::new(0, 0), &puzzle));
    }

    #[test]
    fn test_from_saved_rejects_mismatched_grids() {
        let puzzle = Puzzle::sample();
        let good = Board::fresh(&puzzle).cells().to_vec();
        assert!(Board::from_saved(good.clone(), &puzzle).is_some());

        // Wrong shape.
        let mut short = good.clone();
        short.pop();
        assert!(Board::from_saved(short, &puzzle).is_none());

        // Blocked pattern that does not mirror the puzzle.
        let mut bad_mask = good;
        bad_mask[0][0] = Cell::Blocked;
        assert!(Board::from_saved(bad_mask, &puzzle).is_none());
    }

    #[test]
    fn test_cell_wire_shape() {
        assert_eq!(serde_json::to_string(&Cell::Blocked).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Cell::Empty).unwrap(), "\"\"");
        assert_eq!(serde_json::to_string(&Cell::Filled('A')).unwrap(), "\"A\"");

        let cell: Cell = serde_json::from_str("\"Q\"").unwrap();
        assert_eq!(cell, Cell::Filled('Q'));
        assert!(serde_json::from_str::<Cell>("\"QQ\"").is_err());
    }
}
