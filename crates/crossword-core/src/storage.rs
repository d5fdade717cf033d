use crate::board::Cell;
use crate::controller::PuzzleStatus;
use crate::preferences::Preferences;
use crate::puzzle::{GridDirection, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Snapshot of one puzzle session, keyed by puzzle id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: u64,
    pub board: Vec<Vec<Cell>>,
    pub selected_cell: Position,
    pub direction: GridDirection,
    pub status: PuzzleStatus,
}

/// Persistence port for sessions and preferences.
///
/// Loads return `None` for anything absent or malformed; saves are
/// best-effort and never fail at this level. Implementations log their own
/// write failures and carry on.
pub trait Storage {
    fn load_session(&self, puzzle_id: u64) -> Option<Session>;
    fn save_session(&mut self, session: &Session);
    fn load_preferences(&self) -> Option<Preferences>;
    fn save_preferences(&mut self, preferences: &Preferences);
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn load_session(&self, puzzle_id: u64) -> Option<Session> {
        (**self).load_session(puzzle_id)
    }

    fn save_session(&mut self, session: &Session) {
        (**self).save_session(session)
    }

    fn load_preferences(&self) -> Option<Preferences> {
        (**self).load_preferences()
    }

    fn save_preferences(&mut self, preferences: &Preferences) {
        (**self).save_preferences(preferences)
    }
}

/// In-memory storage backend for tests and examples.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    sessions: HashMap<u64, Session>,
    preferences: Option<Preferences>,
}

impl Storage for MemoryStorage {
    fn load_session(&self, puzzle_id: u64) -> Option<Session> {
        self.sessions.get(&puzzle_id).cloned()
    }

    fn save_session(&mut self, session: &Session) {
        self.sessions.insert(session.id, session.clone());
    }

    fn load_preferences(&self) -> Option<Preferences> {
        self.preferences
    }

    fn save_preferences(&mut self, preferences: &Preferences) {
        self.preferences = Some(*preferences);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::puzzle::Puzzle;

    fn session(id: u64) -> Session {
        let puzzle = Puzzle::sample();
        Session {
            id,
            board: Board::fresh(&puzzle).cells().to_vec(),
            selected_cell: Position::new(0, 0),
            direction: GridDirection::Across,
            status: PuzzleStatus::InProgress,
        }
    }

    #[test]
    fn test_memory_storage_replaces_by_id() {
        let mut storage = MemoryStorage::default();
        assert!(storage.load_session(1).is_none());

        storage.save_session(&session(1));
        let mut updated = session(1);
        updated.selected_cell = Position::new(2, 3);
        storage.save_session(&updated);

        assert_eq!(storage.load_session(1).unwrap().selected_cell, Position::new(2, 3));
        assert!(storage.load_session(2).is_none());
    }

    #[test]
    fn test_session_wire_shape_is_camel_case() {
        let json = serde_json::to_string(&session(1)).unwrap();
        assert!(json.contains("\"selectedCell\":[0,0]"));
        assert!(json.contains("\"direction\":\"across\""));
        assert!(json.contains("\"status\":\"in-progress\""));
    }
}
