//! lifecal-tui - a life calendar for the terminal
//!
//! Renders your lifespan as a grid of weeks, drillable down to days, hours,
//! minutes and seconds, with a Kanagawa Dragon aesthetic and floating sand
//! particles.

mod app;
mod calendar;
mod config;
mod particles;
mod theme;
mod ui;

use std::io::{self, stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use app::App;
use config::{FileStore, MemStore, PrefStore};

/// Frame rate for animations (approximately 30 FPS)
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install().ok();
    run_tui().await
}

/// Run the TUI application
async fn run_tui() -> Result<()> {
    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // One-second clock: the only concurrent activity. It feeds fresh "now"
    // instants to the UI until it is torn down with the terminal.
    let (clock_tx, mut clock_rx) = mpsc::channel::<NaiveDateTime>(4);
    let clock_task = tokio::spawn(run_clock(clock_tx));

    // Preference storage falls back to memory when no home directory exists.
    let store: Box<dyn PrefStore> = match FileStore::new() {
        Some(store) => Box::new(store),
        None => Box::new(MemStore::default()),
    };
    let mut app = App::new(store, chrono::Local::now().naive_local());

    let result = run_event_loop(&mut terminal, &mut app, &mut clock_rx).await;

    // Cleanup
    clock_task.abort();
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Emit the current wall-clock instant once per second.
async fn run_clock(tx: mpsc::Sender<NaiveDateTime>) {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    loop {
        interval.tick().await;
        if tx.send(chrono::Local::now().naive_local()).await.is_err() {
            break;
        }
    }
}

/// Run the main event loop
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    clock_rx: &mut mpsc::Receiver<NaiveDateTime>,
) -> Result<()> {
    loop {
        // Drain pending clock ticks; only the newest instant matters. Every
        // classification is recomputed from it during the draw below.
        while let Ok(now) = clock_rx.try_recv() {
            app.set_now(now);
        }

        // Update animations
        let size = terminal.size()?;
        app.tick(size.width, size.height);

        // Render the UI
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle input events with timeout for animation
        if event::poll(FRAME_DURATION)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        app.handle_key(key);
                    }
                }
                Event::Mouse(mouse) => {
                    if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
                        let area = Rect::new(0, 0, size.width, size.height);
                        if let Some(cell) = ui::hit_test(app, area, mouse.column, mouse.row) {
                            app.activate_cell(cell);
                        }
                    }
                }
                _ => {}
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}
