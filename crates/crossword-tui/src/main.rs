mod app;
mod render;
mod store;
mod theme;

use app::App;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use crossword_core::Puzzle;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use store::FileStorage;
use theme::Theme;

#[derive(Parser)]
#[command(name = "crossword", about = "Terminal crossword player")]
struct Args {
    /// Path to a puzzle definition file (JSON). Defaults to the built-in
    /// sample puzzle.
    puzzle: Option<PathBuf>,

    /// Color theme: dark, light, or high-contrast
    #[arg(long, default_value = "dark")]
    theme: String,

    /// Directory for session, preference, and log files
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let data_dir = args
        .data_dir
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = fs::create_dir_all(&data_dir);

    init_logging(&data_dir);

    // Load the puzzle before touching the terminal so parse errors stay
    // readable.
    let puzzle = match &args.puzzle {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|e| {
                io::Error::new(e.kind(), format!("cannot read {}: {}", path.display(), e))
            })?;
            match Puzzle::from_json(&json) {
                Ok(puzzle) => puzzle,
                Err(e) => {
                    eprintln!("{}: {}", path.display(), e);
                    std::process::exit(1);
                }
            }
        }
        None => Puzzle::sample(),
    };

    let storage = FileStorage::new(data_dir);
    let theme = Theme::from_name(&args.theme);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Run the app
    let result = run_app(&mut stdout, App::new(puzzle, storage, theme));

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

/// Pipe log output to a file in the data directory; stderr is unusable while
/// the terminal is in raw mode.
fn init_logging(data_dir: &std::path::Path) {
    let mut builder = env_logger::Builder::from_default_env();
    if let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("crossword.log"))
    {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    let _ = builder.try_init();
}

fn run_app(stdout: &mut io::Stdout, mut app: App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        // Render
        render::render(stdout, &mut app)?;
        stdout.flush()?;

        // Handle input with a timeout so the message timer keeps ticking
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    // Handle Ctrl+C
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        break;
                    }

                    match app.handle_key(key) {
                        app::AppAction::Continue => {}
                        app::AppAction::Quit => break,
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
