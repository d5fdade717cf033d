use crossword_core::{Preferences, Session, Storage};
use log::warn;
use std::fs;
use std::path::PathBuf;

/// File-backed storage: every session in one JSON array file plus a separate
/// preferences file, both under the data directory.
///
/// Anything unreadable or unparsable reads as absent; write failures are
/// logged and swallowed. The engine stays interactive either way.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn sessions_path(&self) -> PathBuf {
        self.dir.join("crossword_sessions.json")
    }

    fn preferences_path(&self) -> PathBuf {
        self.dir.join("crossword_prefs.json")
    }

    fn read_sessions(&self) -> Vec<Session> {
        match fs::read_to_string(self.sessions_path()) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }
}

impl Storage for FileStorage {
    fn load_session(&self, puzzle_id: u64) -> Option<Session> {
        self.read_sessions()
            .into_iter()
            .find(|session| session.id == puzzle_id)
    }

    fn save_session(&mut self, session: &Session) {
        let mut sessions = self.read_sessions();
        match sessions.iter_mut().find(|s| s.id == session.id) {
            Some(existing) => *existing = session.clone(),
            None => sessions.push(session.clone()),
        }

        match serde_json::to_string(&sessions) {
            Ok(json) => {
                if let Err(e) = fs::write(self.sessions_path(), json) {
                    warn!("failed to write session file: {}", e);
                }
            }
            Err(e) => warn!("failed to serialize sessions: {}", e),
        }
    }

    fn load_preferences(&self) -> Option<Preferences> {
        let json = fs::read_to_string(self.preferences_path()).ok()?;
        serde_json::from_str(&json).ok()
    }

    fn save_preferences(&mut self, preferences: &Preferences) {
        match serde_json::to_string(preferences) {
            Ok(json) => {
                if let Err(e) = fs::write(self.preferences_path(), json) {
                    warn!("failed to write preferences file: {}", e);
                }
            }
            Err(e) => warn!("failed to serialize preferences: {}", e),
        }
    }
}
