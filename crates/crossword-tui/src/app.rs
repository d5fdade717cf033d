use crate::render::Layout;
use crate::store::FileStorage;
use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use crossword_core::{Controller, Key, Puzzle, PuzzleStatus};

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// The main application state: the engine plus presentation-only concerns
/// (theme, transient message, clue-list scrolling, mouse hit-testing).
pub struct App {
    pub controller: Controller<FileStorage>,
    pub theme: Theme,
    /// Message to display
    pub message: Option<String>,
    /// Message timer
    message_timer: u32,
    /// Screen layout of the last render, for mouse hit-testing
    pub layout: Layout,
    /// Scroll offsets for the two clue lists
    pub across_scroll: usize,
    pub down_scroll: usize,
}

impl App {
    pub fn new(puzzle: Puzzle, storage: FileStorage, theme: Theme) -> Self {
        let mut controller = Controller::new(puzzle, storage);
        if controller.status() == PuzzleStatus::NotStarted {
            controller.start();
        }
        controller.save();

        let mut app = Self {
            controller,
            theme,
            message: None,
            message_timer: 0,
            layout: Layout::default(),
            across_scroll: 0,
            down_scroll: 0,
        };
        if app.controller.status() == PuzzleStatus::Completed {
            app.show_message("Puzzle already solved");
        }
        app
    }

    /// Update the message timer (called every tick)
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30; // ~3 seconds at 100ms poll
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        if key.code == KeyCode::Esc {
            return AppAction::Quit;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('a') {
                self.toggle_auto_check();
            }
            return AppAction::Continue;
        }

        // Sessions that have not started or are already solved ignore
        // puzzle input.
        if matches!(
            self.controller.status(),
            PuzzleStatus::NotStarted | PuzzleStatus::Completed
        ) {
            return AppAction::Continue;
        }

        let Some(key) = translate_key(key) else {
            return AppAction::Continue;
        };

        let before = self.controller.status();
        self.controller.handle_key_press(key);
        self.controller.save();
        self.report_status_change(before);
        AppAction::Continue
    }

    /// Route a mouse click to the cell or clue under it
    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if matches!(
            self.controller.status(),
            PuzzleStatus::NotStarted | PuzzleStatus::Completed
        ) {
            return;
        }

        if let Some(cell) = self.layout.hit_cell(event.column, event.row) {
            self.controller.handle_click_cell(cell);
            self.controller.save();
        } else if let Some((id, direction)) = self.layout.hit_clue(event.column, event.row) {
            self.controller.jump_to_clue(id, direction);
            self.controller.save();
        }
    }

    fn toggle_auto_check(&mut self) {
        let enabled = !self.controller.auto_check();
        self.controller.set_auto_check(enabled);
        let state = if enabled { "on" } else { "off" };
        self.show_message(&format!("Auto-check {}", state));
    }

    fn report_status_change(&mut self, before: PuzzleStatus) {
        let after = self.controller.status();
        if after == before {
            return;
        }
        match after {
            PuzzleStatus::Completed => self.show_message("Puzzle solved!"),
            PuzzleStatus::Filled => self.show_message("All cells filled, but something is off"),
            _ => {}
        }
    }
}

/// Translate a terminal key event into the engine's symbolic vocabulary.
/// Anything the engine does not speak maps to `None` and is dropped.
fn translate_key(key: KeyEvent) -> Option<Key> {
    match key.code {
        KeyCode::Backspace | KeyCode::Delete => Some(Key::Backspace),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Tab | KeyCode::BackTab => Some(Key::Tab),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char(c) if !c.is_control() => Some(Key::Char(c.to_ascii_uppercase())),
        _ => None,
    }
}
