//! Terminal User Interface (TUI) for tomato.
//!
//! Shows the running timer and lets the user drive it from the keyboard.
//! Built with ratatui and crossterm.

mod app;
mod event;
mod ui;

pub use app::App;
pub use event::{map_key, Action, AppEvent};

use std::io::{self, Write};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::error::TomatoError;
use crate::focus::{FocusEngine, Ticker};
use crate::persistence::PersistenceNotice;

/// Run the timer screen until the user quits.
///
/// The engine is dropped on return, which releases its persistence handle.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or drawn to.
pub async fn run(
    engine: FocusEngine,
    notices: Option<UnboundedReceiver<PersistenceNotice>>,
    notifications: bool,
) -> Result<(), TomatoError> {
    // Setup terminal
    enable_raw_mode()
        .map_err(|e| TomatoError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| TomatoError::Terminal(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| TomatoError::Terminal(format!("Failed to create terminal: {e}")))?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    // Neither is joined; both stop once their channels close.
    let _input = event::spawn_input_reader(tx.clone());
    let _forwarder = notices.map(|notices| event::forward_notices(notices, tx.clone()));

    let mut app = App::new(engine, Ticker::every_second(tx, AppEvent::Tick), notifications);
    let result = run_app(&mut terminal, &mut app, &mut rx).await;
    app.shutdown();

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Run the main application loop.
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mut UnboundedReceiver<AppEvent>,
) -> Result<(), TomatoError> {
    loop {
        // Draw UI
        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| TomatoError::Terminal(format!("Failed to draw: {e}")))?;

        if app.take_bell() {
            ring_bell();
        }

        let Some(event) = events.recv().await else {
            break;
        };
        app.handle_event(event);

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn ring_bell() {
    let mut stdout = io::stdout();
    if let Err(e) = stdout.write_all(b"\x07").and_then(|()| stdout.flush()) {
        tracing::debug!(error = %e, "could not ring the bell");
    }
}
