use crate::app::App;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use crossword_core::{Cell, GridDirection, Position, PuzzleStatus};
use std::io;

/// Width of one grid cell on screen, border included.
pub const CELL_W: u16 = 4;
/// Height of one grid cell on screen, border included.
pub const CELL_H: u16 = 2;

/// Where the last render put things, for mouse hit-testing.
#[derive(Debug, Default)]
pub struct Layout {
    pub grid_x: u16,
    pub grid_y: u16,
    pub grid_cols: u16,
    pub grid_rows: u16,
    /// Screen row of each visible clue line
    pub clue_rows: Vec<(u16, u32, GridDirection)>,
    pub clue_x: u16,
    pub clue_width: u16,
}

impl Layout {
    pub fn hit_cell(&self, x: u16, y: u16) -> Option<Position> {
        if x <= self.grid_x || y <= self.grid_y {
            return None;
        }
        let col = (x - self.grid_x - 1) / CELL_W;
        let row = (y - self.grid_y - 1) / CELL_H;
        (row < self.grid_rows && col < self.grid_cols)
            .then(|| Position::new(row as usize, col as usize))
    }

    pub fn hit_clue(&self, x: u16, y: u16) -> Option<(u32, GridDirection)> {
        if x < self.clue_x || x >= self.clue_x + self.clue_width {
            return None;
        }
        self.clue_rows
            .iter()
            .find(|&&(row, _, _)| row == y)
            .map(|&(_, id, direction)| (id, direction))
    }
}

pub fn render(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;
    let theme = app.theme.clone();

    execute!(
        stdout,
        Hide,
        SetBackgroundColor(theme.bg),
        Clear(ClearType::All)
    )?;

    let mut layout = Layout {
        grid_x: 2,
        grid_y: 1,
        grid_cols: app.controller.puzzle().width() as u16,
        grid_rows: app.controller.puzzle().height() as u16,
        ..Layout::default()
    };

    render_grid(stdout, app, &layout)?;

    let grid_w = layout.grid_cols * CELL_W + 1;
    let grid_h = layout.grid_rows * CELL_H + 1;

    layout.clue_x = layout.grid_x + grid_w + 3;
    layout.clue_width = term_width
        .saturating_sub(layout.clue_x + 1)
        .min(46);
    if layout.clue_width >= 12 {
        render_clue_lists(stdout, app, &mut layout, term_height)?;
    }

    let info_y = layout.grid_y + grid_h + 1;
    render_status_panel(stdout, app, layout.grid_x, info_y)?;
    render_controls(stdout, app, layout.grid_x, info_y + 3, term_width)?;

    if let Some(msg) = app.message.clone() {
        render_message(stdout, app, &msg, term_width, term_height)?;
    }

    app.layout = layout;
    execute!(stdout, Show)?;
    Ok(())
}

fn render_grid(stdout: &mut io::Stdout, app: &App, layout: &Layout) -> io::Result<()> {
    let theme = &app.theme;
    let controller = &app.controller;
    let width = controller.puzzle().width();
    let height = controller.puzzle().height();
    let current_cells = controller.current_clue().cells.clone();

    let border_line = format!("+{}", "---+".repeat(width));

    for row in 0..height {
        let border_y = layout.grid_y + row as u16 * CELL_H;
        execute!(
            stdout,
            MoveTo(layout.grid_x, border_y),
            SetBackgroundColor(theme.bg),
            SetForegroundColor(theme.border),
            Print(&border_line)
        )?;

        let cell_y = border_y + 1;
        execute!(stdout, MoveTo(layout.grid_x, cell_y))?;
        for col in 0..width {
            execute!(
                stdout,
                SetBackgroundColor(theme.bg),
                SetForegroundColor(theme.border),
                Print("|")
            )?;
            render_cell(stdout, app, Position::new(row, col), &current_cells)?;
        }
        execute!(
            stdout,
            SetBackgroundColor(theme.bg),
            SetForegroundColor(theme.border),
            Print("|")
        )?;
    }

    execute!(
        stdout,
        MoveTo(layout.grid_x, layout.grid_y + height as u16 * CELL_H),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.border),
        Print(&border_line)
    )?;

    Ok(())
}

fn render_cell(
    stdout: &mut io::Stdout,
    app: &App,
    pos: Position,
    current_cells: &[Position],
) -> io::Result<()> {
    let theme = &app.theme;
    let controller = &app.controller;
    let cell = controller.board().get(pos);

    if cell == Cell::Blocked {
        execute!(
            stdout,
            SetBackgroundColor(theme.bg),
            SetForegroundColor(theme.blocked),
            Print("\u{2588}\u{2588}\u{2588}")
        )?;
        return Ok(());
    }

    let bg = if pos == controller.selected_cell() {
        theme.selected_bg
    } else if current_cells.contains(&pos) {
        theme.highlight_bg
    } else {
        theme.bg
    };

    match cell {
        Cell::Filled(c) => {
            let fg = if controller.status() == PuzzleStatus::Completed {
                theme.success
            } else if controller.auto_check() && !controller.is_cell_correct(pos) {
                theme.error
            } else {
                theme.letter
            };
            execute!(
                stdout,
                SetBackgroundColor(bg),
                SetForegroundColor(fg),
                Print(format!(" {} ", c))
            )?;
        }
        Cell::Empty => {
            // Unfilled start cells carry their clue number, dimmed.
            match clue_number_at(app, pos) {
                Some(id) => execute!(
                    stdout,
                    SetBackgroundColor(bg),
                    SetForegroundColor(theme.number),
                    Print(format!("{:<3}", id))
                )?,
                None => execute!(stdout, SetBackgroundColor(bg), Print("   "))?,
            }
        }
        Cell::Blocked => unreachable!(),
    }

    Ok(())
}

/// Crossword number shown in a cell: the id of any clue starting there.
/// Across and down clues starting in the same cell share a number.
fn clue_number_at(app: &App, pos: Position) -> Option<u32> {
    for direction in [GridDirection::Across, GridDirection::Down] {
        for clue in app.controller.clues_for_direction(direction) {
            if clue.start() == pos {
                return Some(clue.id);
            }
        }
    }
    None
}

fn render_clue_lists(
    stdout: &mut io::Stdout,
    app: &mut App,
    layout: &mut Layout,
    term_height: u16,
) -> io::Result<()> {
    let available = term_height.saturating_sub(layout.grid_y + 4) as usize;
    let view = available.saturating_sub(2) / 2;
    if view == 0 {
        return Ok(());
    }

    // Keep the active clue in view on each side, like the DOM renderer's
    // scroll-into-view after every event.
    let direction = app.controller.direction();
    let current_id = app.controller.current_clue().id;
    let inverse_id = app.controller.inverse_current_clue().id;
    let (across_id, down_id) = match direction {
        GridDirection::Across => (current_id, inverse_id),
        GridDirection::Down => (inverse_id, current_id),
    };

    let mut across_scroll = app.across_scroll;
    let mut down_scroll = app.down_scroll;
    if let Some(index) = clue_index(app, GridDirection::Across, across_id) {
        ensure_visible(&mut across_scroll, index, view);
    }
    if let Some(index) = clue_index(app, GridDirection::Down, down_id) {
        ensure_visible(&mut down_scroll, index, view);
    }
    app.across_scroll = across_scroll;
    app.down_scroll = down_scroll;

    let mut y = layout.grid_y;
    y = render_clue_list(
        stdout,
        app,
        layout,
        GridDirection::Across,
        across_scroll,
        view,
        y,
    )?;
    render_clue_list(stdout, app, layout, GridDirection::Down, down_scroll, view, y)?;
    Ok(())
}

fn clue_index(app: &App, direction: GridDirection, id: u32) -> Option<usize> {
    app.controller
        .clues_for_direction(direction)
        .iter()
        .position(|clue| clue.id == id)
}

fn ensure_visible(scroll: &mut usize, index: usize, view: usize) {
    if index < *scroll {
        *scroll = index;
    } else if index >= *scroll + view {
        *scroll = index + 1 - view;
    }
}

fn render_clue_list(
    stdout: &mut io::Stdout,
    app: &App,
    layout: &mut Layout,
    direction: GridDirection,
    scroll: usize,
    view: usize,
    y: u16,
) -> io::Result<u16> {
    let theme = &app.theme;
    let controller = &app.controller;
    let header = match direction {
        GridDirection::Across => "ACROSS",
        GridDirection::Down => "DOWN",
    };
    execute!(
        stdout,
        MoveTo(layout.clue_x, y),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.info),
        Print(header)
    )?;

    let selected = controller.selected_cell();
    let active = controller.direction() == direction;
    let current_id = controller.current_clue().id;

    let clues = controller.clues_for_direction(direction);
    let mut line_y = y + 1;
    for clue in clues.iter().skip(scroll).take(view) {
        let is_current = active && clue.id == current_id;
        let is_inverse = !active && clue.contains(selected);
        let filled = controller.is_clue_filled(clue.id, direction);

        let bg = if is_current {
            theme.selected_bg
        } else if is_inverse {
            theme.highlight_bg
        } else {
            theme.bg
        };
        let fg = if filled { theme.number } else { theme.fg };

        let text = format!("{:>2} {}", clue.id, clue.text);
        let text: String = text.chars().take(layout.clue_width as usize).collect();
        execute!(
            stdout,
            MoveTo(layout.clue_x, line_y),
            SetBackgroundColor(bg),
            SetForegroundColor(fg),
            Print(format!("{:<width$}", text, width = layout.clue_width as usize))
        )?;

        layout.clue_rows.push((line_y, clue.id, direction));
        line_y += 1;
    }

    Ok(line_y + 1)
}

fn render_status_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let controller = &app.controller;
    let puzzle = controller.puzzle();

    execute!(
        stdout,
        MoveTo(x, y),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.info),
        Print(format!(
            "Puzzle {}  {}x{}",
            puzzle.id(),
            puzzle.width(),
            puzzle.height()
        ))
    )?;

    let (status_text, status_color) = match controller.status() {
        PuzzleStatus::NotStarted => ("Not started", theme.info),
        PuzzleStatus::InProgress => ("In progress", theme.info),
        PuzzleStatus::Filled => ("Filled, not quite right", theme.error),
        PuzzleStatus::Completed => ("Solved!", theme.success),
    };
    execute!(
        stdout,
        MoveTo(x, y + 1),
        SetForegroundColor(status_color),
        Print(status_text)
    )?;

    let auto = if controller.auto_check() { "on" } else { "off" };
    let auto_color = if controller.auto_check() {
        theme.key
    } else {
        theme.info
    };
    execute!(
        stdout,
        MoveTo(x, y + 2),
        SetForegroundColor(auto_color),
        Print(format!("Auto-check: {}", auto))
    )?;

    Ok(())
}

fn render_controls(
    stdout: &mut io::Stdout,
    app: &App,
    x: u16,
    y: u16,
    term_width: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let controls =
        "arrows move | Enter/Tab next clue | Space clear | Ctrl+A auto-check | Esc quit";
    let controls: String = controls.chars().take(term_width.saturating_sub(x) as usize).collect();
    execute!(
        stdout,
        MoveTo(x, y),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.key),
        Print(controls)
    )?;
    Ok(())
}

fn render_message(
    stdout: &mut io::Stdout,
    app: &App,
    msg: &str,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let x = (term_width.saturating_sub(msg.len() as u16)) / 2;
    execute!(
        stdout,
        MoveTo(x, term_height.saturating_sub(1)),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.key),
        Print(msg)
    )?;
    Ok(())
}
