//! Core crossword engine.
//!
//! The interesting part lives in [`controller`]: the state machine that turns
//! symbolic input events (key presses, cell clicks, clue clicks) into cursor,
//! fill, and status transitions. [`puzzle`] holds the immutable puzzle
//! definition, [`board`] the player's mutable fill grid, and [`storage`] the
//! persistence port the controller saves sessions and preferences through.

pub mod board;
pub mod controller;
pub mod preferences;
pub mod puzzle;
pub mod storage;

pub use board::{Board, Cell};
pub use controller::{Controller, Key, MoveDirection, MoveMode, PuzzleStatus};
pub use preferences::Preferences;
pub use puzzle::{Clue, GridDirection, Position, Puzzle, PuzzleError};
pub use storage::{MemoryStorage, Session, Storage};
