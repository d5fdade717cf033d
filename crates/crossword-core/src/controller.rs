use crate::board::{Board, Cell};
use crate::preferences::Preferences;
use crate::puzzle::{Clue, GridDirection, Position, Puzzle};
use crate::storage::{Session, Storage};
use log::warn;
use serde::{Deserialize, Serialize};

/// Where a session stands. Recomputed from the board after every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PuzzleStatus {
    NotStarted,
    InProgress,
    /// Every open cell holds a letter, but at least one is wrong.
    Filled,
    /// Every open cell case-exactly matches the solution.
    Completed,
}

/// The symbolic input vocabulary. Hosts translate their raw key events into
/// this before calling [`Controller::handle_key_press`]; anything they cannot
/// express here is simply not delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Enter,
    Tab,
    Left,
    Right,
    Up,
    Down,
    Space,
    Char(char),
}

/// A single-step movement request on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
    Up,
    Down,
}

impl MoveDirection {
    pub fn axis(self) -> GridDirection {
        match self {
            MoveDirection::Left | MoveDirection::Right => GridDirection::Across,
            MoveDirection::Up | MoveDirection::Down => GridDirection::Down,
        }
    }

    pub fn is_forward(self) -> bool {
        matches!(self, MoveDirection::Right | MoveDirection::Down)
    }

    /// The forward direction along a clue axis: rightward for across,
    /// downward for down.
    pub fn forward_along(direction: GridDirection) -> Self {
        match direction {
            GridDirection::Across => MoveDirection::Right,
            GridDirection::Down => MoveDirection::Down,
        }
    }

    pub fn backward_along(direction: GridDirection) -> Self {
        match direction {
            GridDirection::Across => MoveDirection::Left,
            GridDirection::Down => MoveDirection::Up,
        }
    }

    /// One step from `from`, or `None` when that would leave the grid on the
    /// zero side. The far edges are caught by the validity check instead.
    fn step(self, from: Position) -> Option<Position> {
        match self {
            MoveDirection::Left => (from.col > 0).then(|| Position::new(from.row, from.col - 1)),
            MoveDirection::Right => Some(Position::new(from.row, from.col + 1)),
            MoveDirection::Up => (from.row > 0).then(|| Position::new(from.row - 1, from.col)),
            MoveDirection::Down => Some(Position::new(from.row + 1, from.col)),
        }
    }
}

/// How a movement request treats boundaries and occupied cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMode {
    /// Exactly one cell; rejected silently at a blocked cell or the grid edge.
    Plain,
    /// Like `Plain`, but a rejected step jumps to the nearest same-axis clue
    /// instead: its start going forward, its end going backward.
    Force,
    /// Step over already-filled cells to the next empty one, staying inside
    /// the current clue; with no empty cell ahead, fall back to the plain
    /// single step.
    SkipFilled,
    /// Jump to the next empty-or-incorrect cell of the current clue, wrapping
    /// past its end; stay put when the rest of the clue checks out.
    SkipErrorOrEmpty,
}

/// The interaction state machine. Owns the board, cursor, direction, and
/// status; everything mutates through its operations and nothing else.
pub struct Controller<S: Storage> {
    puzzle: Puzzle,
    board: Board,
    selected_cell: Position,
    direction: GridDirection,
    status: PuzzleStatus,
    preferences: Preferences,
    storage: S,
}

impl<S: Storage> Controller<S> {
    /// Build a controller for `puzzle`, restoring a saved session for the
    /// same puzzle id when the storage port has one. A stored session that
    /// does not structurally match the puzzle is discarded as absent.
    pub fn new(puzzle: Puzzle, storage: S) -> Self {
        let preferences = storage.load_preferences().unwrap_or_default();

        let mut restored = None;
        if let Some(session) = storage.load_session(puzzle.id()) {
            let selected_cell = session.selected_cell;
            match Board::from_saved(session.board, &puzzle) {
                Some(board) if puzzle.is_open(selected_cell) => {
                    restored = Some((board, selected_cell, session.direction, session.status));
                }
                _ => {
                    warn!(
                        "discarding saved session for puzzle {}: it does not match the puzzle",
                        puzzle.id()
                    );
                }
            }
        }

        let (board, selected_cell, direction, status) = restored.unwrap_or_else(|| {
            (
                Board::fresh(&puzzle),
                puzzle.first_open_cell(),
                GridDirection::Across,
                PuzzleStatus::NotStarted,
            )
        });

        Self {
            puzzle,
            board,
            selected_cell,
            direction,
            status,
            preferences,
            storage,
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn selected_cell(&self) -> Position {
        self.selected_cell
    }

    pub fn direction(&self) -> GridDirection {
        self.direction
    }

    pub fn status(&self) -> PuzzleStatus {
        self.status
    }

    pub fn auto_check(&self) -> bool {
        self.preferences.auto_check
    }

    pub fn clues_for_direction(&self, direction: GridDirection) -> &[Clue] {
        self.puzzle.clues_for(direction)
    }

    /// Mark the session as started. Callers check the status first; the
    /// transition itself is unconditional.
    pub fn start(&mut self) {
        self.status = PuzzleStatus::InProgress;
    }

    /// The clue the cursor sits in along the active direction.
    pub fn current_clue(&self) -> &Clue {
        self.clue_at(self.selected_cell, self.direction)
    }

    /// The clue containing the cursor in the opposite direction, found by
    /// membership rather than by boundary scan.
    pub fn inverse_current_clue(&self) -> &Clue {
        let direction = self.direction.opposite();
        let clues = self.puzzle.clues_for(direction);
        match clues.iter().find(|clue| clue.contains(self.selected_cell)) {
            Some(clue) => clue,
            None => {
                warn!(
                    "no {} clue contains ({}, {})",
                    direction, self.selected_cell.row, self.selected_cell.col
                );
                &clues[0]
            }
        }
    }

    /// Resolve the clue covering `pos` along `direction` by scanning backward
    /// to the clue start. Malformed numbering falls back to the first clue of
    /// the list; puzzle data is untrusted and interaction must keep going.
    fn clue_at(&self, pos: Position, direction: GridDirection) -> &Clue {
        let start = self.scan_to_clue_start(pos, direction);
        let clues = self.puzzle.clues_for(direction);
        match clues.iter().find(|clue| clue.start() == start) {
            Some(clue) => clue,
            None => {
                warn!(
                    "no {} clue starts at ({}, {})",
                    direction, start.row, start.col
                );
                &clues[0]
            }
        }
    }

    /// Walk backward along the axis while cells stay open; where the walk
    /// stops is the clue start.
    fn scan_to_clue_start(&self, pos: Position, direction: GridDirection) -> Position {
        let backward = MoveDirection::backward_along(direction);
        let mut start = pos;
        while let Some(prev) = backward.step(start) {
            if !self.puzzle.is_open(prev) {
                break;
            }
            start = prev;
        }
        start
    }

    /// Whether every cell of the identified clue holds a letter. An unknown
    /// id reports unfilled.
    pub fn is_clue_filled(&self, id: u32, direction: GridDirection) -> bool {
        match self
            .puzzle
            .clues_for(direction)
            .iter()
            .find(|clue| clue.id == id)
        {
            Some(clue) => clue
                .cells
                .iter()
                .all(|&cell| self.board.get(cell) != Cell::Empty),
            None => {
                warn!("no {} clue with id {}", direction, id);
                false
            }
        }
    }

    pub fn is_cell_correct(&self, pos: Position) -> bool {
        self.board.is_cell_correct(pos, &self.puzzle)
    }

    /// Dispatch one symbolic input event.
    pub fn handle_key_press(&mut self, key: Key) {
        match key {
            Key::Backspace => {
                self.write_selected(Cell::Empty);
                self.move_cursor(
                    MoveDirection::backward_along(self.direction),
                    MoveMode::Plain,
                );
            }
            Key::Enter | Key::Tab => self.advance_clue(),
            Key::Left => {
                if self.change_direction(GridDirection::Across) {
                    return;
                }
                self.move_cursor(MoveDirection::Left, MoveMode::Force);
            }
            Key::Right => {
                if self.change_direction(GridDirection::Across) {
                    return;
                }
                self.move_cursor(MoveDirection::Right, MoveMode::Force);
            }
            Key::Up => {
                if self.change_direction(GridDirection::Down) {
                    return;
                }
                self.move_cursor(MoveDirection::Up, MoveMode::Force);
            }
            Key::Down => {
                if self.change_direction(GridDirection::Down) {
                    return;
                }
                self.move_cursor(MoveDirection::Down, MoveMode::Force);
            }
            Key::Space => {
                self.write_selected(Cell::Empty);
                self.move_cursor(
                    MoveDirection::forward_along(self.direction),
                    MoveMode::Plain,
                );
            }
            Key::Char(c) => {
                self.write_selected(Cell::Filled(c));
                let mode = if self.preferences.auto_check {
                    MoveMode::SkipErrorOrEmpty
                } else {
                    MoveMode::SkipFilled
                };
                self.move_cursor(MoveDirection::forward_along(self.direction), mode);
            }
        }
    }

    /// Select a clicked cell, or flip the direction when the cell is already
    /// selected. Blocked and out-of-bounds clicks do nothing.
    pub fn handle_click_cell(&mut self, cell: Position) {
        if !self.puzzle.is_open(cell) {
            return;
        }
        if cell == self.selected_cell {
            self.direction = self.direction.opposite();
        } else {
            self.selected_cell = cell;
        }
    }

    /// Select the named clue's first cell and make its direction active.
    /// An unknown id changes nothing.
    pub fn jump_to_clue(&mut self, id: u32, direction: GridDirection) {
        let Some(clue) = self
            .puzzle
            .clues_for(direction)
            .iter()
            .find(|clue| clue.id == id)
        else {
            warn!("no {} clue with id {}", direction, id);
            return;
        };
        let start = clue.start();
        self.direction = direction;
        self.selected_cell = start;
    }

    /// Snapshot the session through the storage port.
    pub fn save(&mut self) {
        let session = Session {
            id: self.puzzle.id(),
            board: self.board.cells().to_vec(),
            selected_cell: self.selected_cell,
            direction: self.direction,
            status: self.status,
        };
        self.storage.save_session(&session);
    }

    /// Flip the auto-check preference and persist it immediately.
    pub fn set_auto_check(&mut self, enabled: bool) {
        self.preferences.auto_check = enabled;
        self.storage.save_preferences(&self.preferences);
    }

    fn write_selected(&mut self, value: Cell) {
        self.board.set(self.selected_cell, value);
        self.status = if self.board.is_filled_correctly(&self.puzzle) {
            PuzzleStatus::Completed
        } else if self.board.is_filled() {
            PuzzleStatus::Filled
        } else {
            PuzzleStatus::InProgress
        };
    }

    /// Move to the next clue with a strictly greater id in the active
    /// direction; past the end of the list, flip direction and wrap to the
    /// first clue of the other list.
    fn advance_clue(&mut self) {
        let current_id = self.current_clue().id;
        if let Some(next) = self
            .puzzle
            .clues_for(self.direction)
            .iter()
            .find(|clue| clue.id > current_id)
        {
            self.selected_cell = next.start();
        } else {
            self.direction = self.direction.opposite();
            self.selected_cell = self.puzzle.clues_for(self.direction)[0].start();
        }
    }

    fn change_direction(&mut self, direction: GridDirection) -> bool {
        if self.direction != direction {
            self.direction = direction;
            return true;
        }
        false
    }

    /// The movement primitive. All cursor motion besides clue jumps funnels
    /// through here, parameterized by [`MoveMode`].
    fn move_cursor(&mut self, direction: MoveDirection, mode: MoveMode) {
        match mode {
            MoveMode::Plain => {
                self.plain_step(direction);
            }
            MoveMode::Force => {
                if !self.plain_step(direction) {
                    self.force_to_adjacent_clue(direction);
                }
            }
            MoveMode::SkipFilled => self.skip_filled_step(direction),
            MoveMode::SkipErrorOrEmpty => self.skip_to_error_or_empty(direction),
        }
    }

    /// One cell in `direction`; reports whether the cursor moved.
    fn plain_step(&mut self, direction: MoveDirection) -> bool {
        if let Some(next) = direction.step(self.selected_cell) {
            if self.puzzle.is_open(next) {
                self.selected_cell = next;
                return true;
            }
        }
        false
    }

    /// Jump to the nearest clue on the correct side of the current one,
    /// restricted to clues on the same row (moving across) or column (moving
    /// down). Nearest by id, not by list order. With no candidate the cursor
    /// stays put.
    fn force_to_adjacent_clue(&mut self, direction: MoveDirection) {
        let current = self.current_clue().clone();
        let same_line = |clue: &Clue| match direction.axis() {
            GridDirection::Across => clue.start().row == current.start().row,
            GridDirection::Down => clue.start().col == current.start().col,
        };

        let clues = self.puzzle.clues_for(self.direction);
        let target = if direction.is_forward() {
            clues
                .iter()
                .filter(|clue| clue.id > current.id && same_line(clue))
                .min_by_key(|clue| clue.id)
                .map(|clue| clue.start())
        } else {
            clues
                .iter()
                .filter(|clue| clue.id < current.id && same_line(clue))
                .max_by_key(|clue| clue.id)
                .map(|clue| clue.end())
        };

        if let Some(pos) = target {
            self.selected_cell = pos;
        }
    }

    /// Advance past already-filled cells to the next empty cell of the
    /// current clue. At the clue's last cell the cursor stays; with no empty
    /// cell ahead it falls back to the plain single step.
    fn skip_filled_step(&mut self, direction: MoveDirection) {
        let clue = self.current_clue().clone();
        if self.selected_cell == clue.end() {
            return;
        }

        let mut next = direction.step(self.selected_cell);
        while let Some(pos) = next {
            if !self.puzzle.is_open(pos) || !clue.contains(pos) {
                break;
            }
            if self.board.get(pos) == Cell::Empty {
                self.selected_cell = pos;
                return;
            }
            next = direction.step(pos);
        }

        self.plain_step(direction);
    }

    /// Advance to the next cell of the current clue that is empty or does not
    /// match the solution, wrapping past the clue's end and excluding the
    /// cursor cell itself. With nothing left to fix the cursor stays.
    fn skip_to_error_or_empty(&mut self, direction: MoveDirection) {
        let clue = self.current_clue().clone();
        let Some(index) = clue.cells.iter().position(|&c| c == self.selected_cell) else {
            // Fallback clue from malformed numbering; nothing sane to scan.
            return;
        };

        let len = clue.cells.len();
        for offset in 1..len {
            let i = if direction.is_forward() {
                (index + offset) % len
            } else {
                (index + len - offset) % len
            };
            let pos = clue.cells[i];
            if !self.board.is_cell_correct(pos, &self.puzzle) {
                self.selected_cell = pos;
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn controller() -> Controller<MemoryStorage> {
        let mut controller = Controller::new(Puzzle::sample(), MemoryStorage::default());
        controller.start();
        controller
    }

    fn type_word(controller: &mut Controller<impl Storage>, word: &str) {
        for c in word.chars() {
            controller.handle_key_press(Key::Char(c));
        }
    }

    fn fill_correctly(controller: &mut Controller<impl Storage>) {
        // Across answers of the sample puzzle, typed clue by clue.
        for word in ["CABS", "ATONCE", "PUPILS", "SLIPUP", "TEEN"] {
            type_word(controller, word);
            controller.handle_key_press(Key::Enter);
        }
    }

    /// A one-row puzzle with two across clues separated by a blocked cell,
    /// for exercising force movement between same-row clues.
    fn split_row_puzzle() -> Puzzle {
        Puzzle::from_json(
            r#"{
                "id": 9, "width": 5, "height": 1,
                "cells": [["A", "B", null, "C", "D"]],
                "acrossClues": [
                    {"id": 1, "text": "ab", "cells": [[0, 0], [0, 1]]},
                    {"id": 2, "text": "cd", "cells": [[0, 3], [0, 4]]}
                ],
                "downClues": [
                    {"id": 1, "text": "a", "cells": [[0, 0]]},
                    {"id": 2, "text": "b", "cells": [[0, 1]]},
                    {"id": 3, "text": "c", "cells": [[0, 3]]},
                    {"id": 4, "text": "d", "cells": [[0, 4]]}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_fresh_session_state() {
        let controller = Controller::new(Puzzle::sample(), MemoryStorage::default());
        assert_eq!(controller.status(), PuzzleStatus::NotStarted);
        assert_eq!(controller.selected_cell(), Position::new(0, 0));
        assert_eq!(controller.direction(), GridDirection::Across);
        assert!(!controller.auto_check());
    }

    #[test]
    fn test_start_marks_in_progress() {
        let mut controller = Controller::new(Puzzle::sample(), MemoryStorage::default());
        controller.start();
        assert_eq!(controller.status(), PuzzleStatus::InProgress);
    }

    #[test]
    fn test_current_clue_contains_selected_cell_everywhere() {
        let mut controller = controller();
        let puzzle = Puzzle::sample();
        for row in 0..puzzle.height() {
            for col in 0..puzzle.width() {
                let pos = Position::new(row, col);
                if !puzzle.is_open(pos) {
                    continue;
                }
                controller.handle_click_cell(pos);
                assert!(
                    controller.current_clue().contains(pos),
                    "across clue at ({}, {})",
                    row,
                    col
                );
                assert!(
                    controller.inverse_current_clue().contains(pos),
                    "down clue at ({}, {})",
                    row,
                    col
                );
            }
        }
    }

    #[test]
    fn test_inverse_clue_is_the_crossing_clue() {
        let mut controller = controller();
        controller.handle_click_cell(Position::new(1, 2));
        assert_eq!(controller.current_clue().id, 5);
        assert_eq!(controller.inverse_current_clue().id, 3);
    }

    #[test]
    fn test_typing_advances_through_the_clue() {
        let mut controller = controller();
        assert_eq!(controller.current_clue().start(), Position::new(0, 0));

        type_word(&mut controller, "CABS");

        // One cell per character, parked on the clue's last cell.
        assert_eq!(controller.selected_cell(), Position::new(0, 3));
        let board = controller.board();
        assert_eq!(board.get(Position::new(0, 0)), Cell::Filled('C'));
        assert_eq!(board.get(Position::new(0, 1)), Cell::Filled('A'));
        assert_eq!(board.get(Position::new(0, 2)), Cell::Filled('B'));
        assert_eq!(board.get(Position::new(0, 3)), Cell::Filled('S'));
        assert_eq!(controller.status(), PuzzleStatus::InProgress);
    }

    #[test]
    fn test_click_selected_cell_toggles_direction() {
        let mut controller = controller();
        let selected = controller.selected_cell();
        controller.handle_click_cell(selected);
        assert_eq!(controller.direction(), GridDirection::Down);
        assert_eq!(controller.selected_cell(), selected);
        controller.handle_click_cell(selected);
        assert_eq!(controller.direction(), GridDirection::Across);
    }

    #[test]
    fn test_click_other_cell_moves_preserving_direction() {
        let mut controller = controller();
        controller.handle_click_cell(Position::new(2, 3));
        assert_eq!(controller.selected_cell(), Position::new(2, 3));
        assert_eq!(controller.direction(), GridDirection::Across);
    }

    #[test]
    fn test_click_blocked_or_out_of_bounds_is_ignored() {
        let mut controller = controller();
        let before = controller.selected_cell();
        controller.handle_click_cell(Position::new(0, 4));
        controller.handle_click_cell(Position::new(9, 9));
        assert_eq!(controller.selected_cell(), before);
        assert_eq!(controller.direction(), GridDirection::Across);
    }

    #[test]
    fn test_arrow_off_axis_only_changes_direction() {
        let mut controller = controller();
        controller.handle_click_cell(Position::new(1, 0));

        controller.handle_key_press(Key::Up);
        assert_eq!(controller.direction(), GridDirection::Down);
        assert_eq!(controller.selected_cell(), Position::new(1, 0));

        // Direction already matches; now the cursor moves.
        controller.handle_key_press(Key::Up);
        assert_eq!(controller.selected_cell(), Position::new(0, 0));
    }

    #[test]
    fn test_advance_clue_walks_the_list() {
        let mut controller = controller();
        controller.handle_key_press(Key::Enter);
        assert_eq!(controller.current_clue().id, 5);
        assert_eq!(controller.selected_cell(), Position::new(1, 0));
        controller.handle_key_press(Key::Tab);
        assert_eq!(controller.current_clue().id, 8);
    }

    #[test]
    fn test_advance_clue_wraps_to_the_other_direction() {
        let mut controller = controller();
        controller.jump_to_clue(10, GridDirection::Across);
        controller.handle_key_press(Key::Enter);
        assert_eq!(controller.direction(), GridDirection::Down);
        assert_eq!(controller.current_clue().id, 1);
        assert_eq!(controller.selected_cell(), Position::new(0, 0));
    }

    #[test]
    fn test_force_moves_to_nearest_same_row_clue() {
        let mut controller = Controller::new(split_row_puzzle(), MemoryStorage::default());
        controller.start();
        controller.handle_click_cell(Position::new(0, 1));

        // (0, 2) is blocked; force jumps to the start of clue 2.
        controller.handle_key_press(Key::Right);
        assert_eq!(controller.selected_cell(), Position::new(0, 3));

        // And back again, landing on the end of clue 1.
        controller.handle_key_press(Key::Left);
        assert_eq!(controller.selected_cell(), Position::new(0, 1));
    }

    #[test]
    fn test_force_with_no_candidate_clue_stays_put() {
        let mut controller = controller();
        controller.handle_click_cell(Position::new(0, 3));
        // (0, 4) is blocked and no other across clue shares row 0.
        controller.handle_key_press(Key::Right);
        assert_eq!(controller.selected_cell(), Position::new(0, 3));
    }

    #[test]
    fn test_backspace_clears_and_steps_back() {
        let mut controller = controller();
        type_word(&mut controller, "CA");
        assert_eq!(controller.selected_cell(), Position::new(0, 2));

        controller.handle_key_press(Key::Backspace);
        assert_eq!(controller.board().get(Position::new(0, 2)), Cell::Empty);
        assert_eq!(controller.selected_cell(), Position::new(0, 1));

        // At the clue boundary the step back is rejected, not forced.
        controller.handle_key_press(Key::Backspace);
        controller.handle_key_press(Key::Backspace);
        assert_eq!(controller.selected_cell(), Position::new(0, 0));
        assert_eq!(controller.board().get(Position::new(0, 0)), Cell::Empty);
    }

    #[test]
    fn test_space_clears_and_advances() {
        let mut controller = controller();
        type_word(&mut controller, "X");
        controller.handle_click_cell(Position::new(0, 0));
        controller.handle_key_press(Key::Space);
        assert_eq!(controller.board().get(Position::new(0, 0)), Cell::Empty);
        assert_eq!(controller.selected_cell(), Position::new(0, 1));
    }

    #[test]
    fn test_typing_skips_already_filled_cells() {
        let mut controller = controller();
        controller.handle_click_cell(Position::new(0, 1));
        type_word(&mut controller, "A");
        controller.handle_click_cell(Position::new(0, 0));

        // (0, 1) already holds a letter, so typing lands on (0, 2).
        type_word(&mut controller, "C");
        assert_eq!(controller.selected_cell(), Position::new(0, 2));
    }

    #[test]
    fn test_typing_with_everything_ahead_filled_takes_one_step() {
        let mut controller = controller();
        // Filled back to front so no click lands on the cursor cell, which
        // would toggle the direction instead of selecting.
        for pos in [Position::new(0, 3), Position::new(0, 2), Position::new(0, 1)] {
            controller.handle_click_cell(pos);
            type_word(&mut controller, "X");
        }
        controller.handle_click_cell(Position::new(0, 0));
        type_word(&mut controller, "C");
        assert_eq!(controller.selected_cell(), Position::new(0, 1));
    }

    #[test]
    fn test_auto_check_skips_to_the_next_wrong_cell() {
        let mut controller = controller();
        controller.set_auto_check(true);

        type_word(&mut controller, "CXB");
        assert_eq!(controller.selected_cell(), Position::new(0, 3));

        // Typing the last letter wraps the scan back to the bad X at (0, 1).
        type_word(&mut controller, "S");
        assert_eq!(controller.selected_cell(), Position::new(0, 1));
    }

    #[test]
    fn test_auto_check_stays_when_the_clue_is_correct() {
        let mut controller = controller();
        controller.set_auto_check(true);
        type_word(&mut controller, "CABS");
        assert_eq!(controller.selected_cell(), Position::new(0, 3));
    }

    #[test]
    fn test_completion_status_transitions() {
        let mut controller = controller();
        fill_correctly(&mut controller);
        assert_eq!(controller.status(), PuzzleStatus::Completed);

        // Breaking one cell leaves the board filled but not completed.
        controller.handle_click_cell(Position::new(0, 0));
        controller.handle_key_press(Key::Char('X'));
        assert_eq!(controller.status(), PuzzleStatus::Filled);

        // Clearing a cell re-derives in-progress.
        controller.handle_key_press(Key::Backspace);
        assert_eq!(controller.status(), PuzzleStatus::InProgress);
    }

    #[test]
    fn test_jump_to_clue() {
        let mut controller = controller();
        controller.jump_to_clue(6, GridDirection::Down);
        assert_eq!(controller.direction(), GridDirection::Down);
        assert_eq!(controller.selected_cell(), Position::new(1, 4));

        // Unknown id changes nothing.
        controller.jump_to_clue(99, GridDirection::Across);
        assert_eq!(controller.direction(), GridDirection::Down);
        assert_eq!(controller.selected_cell(), Position::new(1, 4));
    }

    #[test]
    fn test_is_clue_filled() {
        let mut controller = controller();
        assert!(!controller.is_clue_filled(1, GridDirection::Across));
        type_word(&mut controller, "CABS");
        assert!(controller.is_clue_filled(1, GridDirection::Across));
        // Row 0 only fills one cell of the crossing down clue.
        assert!(!controller.is_clue_filled(1, GridDirection::Down));
        assert!(!controller.is_clue_filled(99, GridDirection::Across));
    }

    #[test]
    fn test_malformed_numbering_falls_back_to_first_clue() {
        // The only across clue does not start where the boundary scan lands.
        let puzzle = Puzzle::from_json(
            r#"{
                "id": 3, "width": 2, "height": 1,
                "cells": [["A", "B"]],
                "acrossClues": [{"id": 4, "text": "b", "cells": [[0, 1]]}],
                "downClues": [
                    {"id": 1, "text": "a", "cells": [[0, 0]]},
                    {"id": 2, "text": "b", "cells": [[0, 1]]}
                ]
            }"#,
        )
        .unwrap();
        let mut controller = Controller::new(puzzle, MemoryStorage::default());
        controller.start();
        assert_eq!(controller.selected_cell(), Position::new(0, 0));
        assert_eq!(controller.current_clue().id, 4);
    }

    #[test]
    fn test_save_and_restore_round_trip() {
        let mut storage = MemoryStorage::default();
        {
            let mut controller = Controller::new(Puzzle::sample(), &mut storage);
            controller.start();
            type_word(&mut controller, "CAB");
            controller.handle_click_cell(Position::new(2, 2));
            controller.handle_click_cell(Position::new(2, 2));
            controller.save();
        }

        let restored = Controller::new(Puzzle::sample(), &mut storage);
        assert_eq!(restored.status(), PuzzleStatus::InProgress);
        assert_eq!(restored.selected_cell(), Position::new(2, 2));
        assert_eq!(restored.direction(), GridDirection::Down);
        assert_eq!(restored.board().get(Position::new(0, 1)), Cell::Filled('A'));
    }

    #[test]
    fn test_mismatched_session_degrades_to_fresh() {
        let mut storage = MemoryStorage::default();
        storage.save_session(&Session {
            id: 1,
            board: vec![vec![Cell::Empty; 2]; 2],
            selected_cell: Position::new(0, 0),
            direction: GridDirection::Down,
            status: PuzzleStatus::InProgress,
        });

        let controller = Controller::new(Puzzle::sample(), &mut storage);
        assert_eq!(controller.status(), PuzzleStatus::NotStarted);
        assert_eq!(controller.selected_cell(), Position::new(0, 0));
        assert_eq!(controller.direction(), GridDirection::Across);
    }

    #[test]
    fn test_session_with_blocked_cursor_degrades_to_fresh() {
        let puzzle = Puzzle::sample();
        let mut storage = MemoryStorage::default();
        storage.save_session(&Session {
            id: 1,
            board: Board::fresh(&puzzle).cells().to_vec(),
            selected_cell: Position::new(0, 5),
            direction: GridDirection::Across,
            status: PuzzleStatus::InProgress,
        });

        let controller = Controller::new(puzzle, &mut storage);
        assert_eq!(controller.status(), PuzzleStatus::NotStarted);
        assert_eq!(controller.selected_cell(), Position::new(0, 0));
    }

    #[test]
    fn test_auto_check_preference_persists() {
        let mut storage = MemoryStorage::default();
        {
            let mut controller = Controller::new(Puzzle::sample(), &mut storage);
            controller.set_auto_check(true);
        }
        let controller = Controller::new(Puzzle::sample(), &mut storage);
        assert!(controller.auto_check());
    }

    #[test]
    fn test_status_wire_shape() {
        assert_eq!(
            serde_json::to_string(&PuzzleStatus::NotStarted).unwrap(),
            "\"not-started\""
        );
        assert_eq!(
            serde_json::to_string(&PuzzleStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
    }
}
