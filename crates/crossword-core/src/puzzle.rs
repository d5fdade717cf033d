use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A zero-based (row, column) grid coordinate.
///
/// Serialized as a `[row, col]` array, the shape used by puzzle definition
/// files and saved sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(&self.row)?;
        seq.serialize_element(&self.col)?;
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [row, col] = <[usize; 2]>::deserialize(deserializer)?;
        Ok(Self { row, col })
    }
}

/// The two clue families of a crossword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridDirection {
    Across,
    Down,
}

impl GridDirection {
    pub fn opposite(self) -> Self {
        match self {
            GridDirection::Across => GridDirection::Down,
            GridDirection::Down => GridDirection::Across,
        }
    }
}

impl fmt::Display for GridDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GridDirection::Across => "across",
            GridDirection::Down => "down",
        })
    }
}

/// A numbered span of contiguous grid cells with its display text.
///
/// Clue ids follow crossword numbering and are NOT unique across directions:
/// id 1 may exist in both the across and down lists at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    pub id: u32,
    pub text: String,
    pub cells: Vec<Position>,
}

impl Clue {
    /// First cell of the span. This is the "clue start" the controller's
    /// boundary scan resolves to.
    pub fn start(&self) -> Position {
        self.cells[0]
    }

    /// Last cell of the span.
    pub fn end(&self) -> Position {
        self.cells[self.cells.len() - 1]
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }
}

/// Structural problems in a puzzle definition.
///
/// Only shape-level damage is rejected here; questionable clue NUMBERING
/// (a clue whose first cell is not a clue start, say) is handled at runtime
/// by the controller's logged fallbacks, since puzzle data comes from an
/// untrusted external ingestion step.
#[derive(Debug)]
pub enum PuzzleError {
    Parse(String),
    ZeroDimension,
    GridShape,
    MissingClues(GridDirection),
    EmptyClue { direction: GridDirection, id: u32 },
    UnorderedClues(GridDirection),
    ClueCellOutOfBounds { direction: GridDirection, id: u32 },
    ClueCellBlocked { direction: GridDirection, id: u32 },
    NoOpenCells,
}

impl fmt::Display for PuzzleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PuzzleError::Parse(msg) => write!(f, "malformed puzzle definition: {}", msg),
            PuzzleError::ZeroDimension => write!(f, "puzzle dimensions must be non-zero"),
            PuzzleError::GridShape => write!(f, "cell grid does not match the declared dimensions"),
            PuzzleError::MissingClues(d) => write!(f, "puzzle has no {} clues", d),
            PuzzleError::EmptyClue { direction, id } => {
                write!(f, "{} clue {} has no cells", direction, id)
            }
            PuzzleError::UnorderedClues(d) => {
                write!(f, "{} clues are not in ascending id order", d)
            }
            PuzzleError::ClueCellOutOfBounds { direction, id } => {
                write!(f, "{} clue {} names a cell outside the grid", direction, id)
            }
            PuzzleError::ClueCellBlocked { direction, id } => {
                write!(f, "{} clue {} names a blocked cell", direction, id)
            }
            PuzzleError::NoOpenCells => write!(f, "puzzle has no open cells"),
        }
    }
}

impl std::error::Error for PuzzleError {}

/// The immutable puzzle definition: solution grid plus the two clue lists.
///
/// `None` in the grid is a blocked cell. The puzzle never changes after
/// construction; the player's fill lives in [`crate::Board`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    id: u64,
    width: usize,
    height: usize,
    cells: Vec<Vec<Option<char>>>,
    across_clues: Vec<Clue>,
    down_clues: Vec<Clue>,
}

impl Puzzle {
    /// Parse a puzzle definition from its JSON form and validate its shape.
    pub fn from_json(json: &str) -> Result<Self, PuzzleError> {
        let puzzle: Puzzle =
            serde_json::from_str(json).map_err(|e| PuzzleError::Parse(e.to_string()))?;
        puzzle.validate()?;
        Ok(puzzle)
    }

    fn validate(&self) -> Result<(), PuzzleError> {
        if self.width == 0 || self.height == 0 {
            return Err(PuzzleError::ZeroDimension);
        }
        if self.cells.len() != self.height || self.cells.iter().any(|row| row.len() != self.width) {
            return Err(PuzzleError::GridShape);
        }
        if !self.cells.iter().flatten().any(|cell| cell.is_some()) {
            return Err(PuzzleError::NoOpenCells);
        }

        for (direction, clues) in [
            (GridDirection::Across, &self.across_clues),
            (GridDirection::Down, &self.down_clues),
        ] {
            if clues.is_empty() {
                return Err(PuzzleError::MissingClues(direction));
            }
            if clues.windows(2).any(|pair| pair[0].id >= pair[1].id) {
                return Err(PuzzleError::UnorderedClues(direction));
            }
            for clue in clues {
                if clue.cells.is_empty() {
                    return Err(PuzzleError::EmptyClue {
                        direction,
                        id: clue.id,
                    });
                }
                for &cell in &clue.cells {
                    if cell.row >= self.height || cell.col >= self.width {
                        return Err(PuzzleError::ClueCellOutOfBounds {
                            direction,
                            id: clue.id,
                        });
                    }
                    if self.cells[cell.row][cell.col].is_none() {
                        return Err(PuzzleError::ClueCellBlocked {
                            direction,
                            id: clue.id,
                        });
                    }
                }
            }
        }

        Ok(())
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Solution letter at `pos`, or `None` for a blocked cell.
    ///
    /// Precondition: `pos` is in bounds.
    pub fn solution(&self, pos: Position) -> Option<char> {
        self.cells[pos.row][pos.col]
    }

    /// Whether `pos` is in bounds and not blocked.
    pub fn is_open(&self, pos: Position) -> bool {
        pos.row < self.height && pos.col < self.width && self.cells[pos.row][pos.col].is_some()
    }

    pub fn clues_for(&self, direction: GridDirection) -> &[Clue] {
        match direction {
            GridDirection::Across => &self.across_clues,
            GridDirection::Down => &self.down_clues,
        }
    }

    /// First non-blocked cell in row-major order. Used for fresh-session
    /// cursor placement so the cursor invariant holds even when (0, 0) is
    /// blocked. Validation guarantees at least one open cell exists.
    pub fn first_open_cell(&self) -> Position {
        for row in 0..self.height {
            for col in 0..self.width {
                if self.cells[row][col].is_some() {
                    return Position::new(row, col);
                }
            }
        }
        unreachable!("validated puzzle has at least one open cell")
    }

    /// The built-in sample puzzle, a 5x6 mini.
    pub fn sample() -> Self {
        let puzzle = Self {
            id: 1,
            width: 6,
            height: 5,
            cells: vec![
                vec![Some('C'), Some('A'), Some('B'), Some('S'), None, None],
                vec![Some('A'), Some('T'), Some('O'), Some('N'), Some('C'), Some('E')],
                vec![Some('P'), Some('U'), Some('P'), Some('I'), Some('L'), Some('S')],
                vec![Some('S'), Some('L'), Some('I'), Some('P'), Some('U'), Some('P')],
                vec![None, None, Some('T'), Some('E'), Some('E'), Some('N')],
            ],
            across_clues: vec![
                clue(1, "Wines that Napa Valley is renowned for, informally", row_span(0, 0, 4)),
                clue(5, "\"Right away!\"", row_span(1, 0, 6)),
                clue(8, "School students", row_span(2, 0, 6)),
                clue(9, "Make a mistake ... or maybe 8-Across backward", row_span(3, 0, 6)),
                clue(10, "Many a new driver", row_span(4, 2, 4)),
            ],
            down_clues: vec![
                clue(1, "Items of clothing that may be worn backwards", col_span(0, 0, 4)),
                clue(
                    2,
                    "___ Gawande, surgeon with the #1 New York Times best seller \"Being Mortal\"",
                    col_span(0, 1, 4),
                ),
                clue(3, "Hasbro toy with a pull handle and twistable crank", col_span(0, 2, 5)),
                clue(4, "Criticize snarkily, with \"at\"", col_span(0, 3, 5)),
                clue(6, "You're reading it", col_span(1, 4, 4)),
                clue(7, "Channel with \"2\" and \"U\" spinoffs", col_span(1, 5, 4)),
            ],
        };
        debug_assert!(puzzle.validate().is_ok());
        puzzle
    }
}

fn clue(id: u32, text: &str, cells: Vec<Position>) -> Clue {
    Clue {
        id,
        text: text.to_string(),
        cells,
    }
}

fn row_span(row: usize, col: usize, len: usize) -> Vec<Position> {
    (0..len).map(|i| Position::new(row, col + i)).collect()
}

fn col_span(row: usize, col: usize, len: usize) -> Vec<Position> {
    (0..len).map(|i| Position::new(row + i, col)).collect()
}
