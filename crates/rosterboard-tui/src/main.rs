//! Rosterboard - a terminal magnetic board for the daily staff roster.
//!
//! Staff magnets are placed into a 4 session x 5 column grid, physio FTE is
//! tallied live, and the finished board can be exported as an image.

mod app;
mod config;
mod share;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use rosterboard_core::export::{self, BoardRasterizer, BoardSnapshot, ExportOptions, TinySkiaRasterizer};
use rosterboard_core::RosterState;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use config::Config;
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file prefix; the appender adds the date
const LOG_FILE_PREFIX: &str = "rosterboard.log";

const USAGE: &str = "\
Usage: rosterboard [OPTIONS]

Options:
  --export [DIR]   Render the empty board to an image and exit
  --list-staff     Print the staff directory as JSON and exit
  -h, --help       Show this message";

fn env_filter() -> EnvFilter {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to a daily file while the TUI owns the terminal.
///
/// The returned guard flushes the writer on drop and must be held until exit.
fn init_file_tracing() -> Option<WorkerGuard> {
    let dir = config::log_dir()?;
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Warning: cannot create log directory {}: {}", dir.display(), e);
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(env_filter())
        .init();
    Some(guard)
}

/// Log to stderr for the headless commands.
fn init_stderr_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("--list-staff") => {
            init_stderr_tracing();
            return list_staff();
        }
        Some("--export") => {
            init_stderr_tracing();
            return export_headless(args.get(1).map(PathBuf::from)).await;
        }
        Some("-h") | Some("--help") => {
            println!("{}", USAGE);
            return Ok(());
        }
        Some(other) => {
            eprintln!("Unknown option: {}\n\n{}", other, USAGE);
            std::process::exit(2);
        }
        None => {}
    }

    // Initialize logging
    let _guard = init_file_tracing();
    info!("Rosterboard starting");

    let config = load_config();
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Rosterboard shutting down");
    Ok(())
}

/// A broken config file is reported and ignored rather than fatal.
fn load_config() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(e) => {
            let error = format!("{:#}", e);
            warn!(error = %error, "Using default configuration");
            Config::default()
        }
    }
}

/// Print the staff directory as JSON to stdout
fn list_staff() -> Result<()> {
    let directory = load_config().staff_directory()?;
    let json = serde_json::to_string_pretty(directory.members())?;
    println!("{}", json);
    Ok(())
}

/// Render the empty board and save it without starting the TUI
async fn export_headless(dir: Option<PathBuf>) -> Result<()> {
    let config = load_config();
    let directory = config.staff_directory()?;
    let dir = dir.unwrap_or_else(|| config.export_dir());

    let snapshot = BoardSnapshot::capture(&directory, &RosterState::new());
    let options = ExportOptions::default();
    let artifact = tokio::task::spawn_blocking(move || {
        TinySkiaRasterizer::new().render(&snapshot, &options)
    })
    .await
    .context("Render task failed")??;

    let date = app::today();
    let path = export::save_artifact(&dir, &artifact, date)
        .with_context(|| format!("Failed to save image in {}", dir.display()))?;

    eprintln!(
        "Saved {} ({} x {} px)",
        path.display(),
        artifact.width,
        artifact.height
    );
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout so finished exports show up promptly
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
