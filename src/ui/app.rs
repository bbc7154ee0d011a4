//! Application setup, teardown, and main entry point.

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::Terminal;
use std::io::stdout;
use tracing::warn;

use crate::actions::controller::TriggerController;
use crate::actions::history::HistoryStore;
use crate::actions::store::RonStateFile;
use crate::data::state::AppState;
use crate::error::Result;
use crate::ui::panes::terminal::EmbeddedTerminal;
use crate::watch::SaveWatcher;

/// Long-lived collaborators of the event loop.
pub struct App {
    pub controller: TriggerController,
    pub history: HistoryStore<RonStateFile>,
    /// `None` when the directory could not be watched; manual runs still work.
    pub watcher: Option<SaveWatcher>,
    pub save_all_hook: Option<String>,
    pub shell: Option<String>,
}

/// Run the TUI application.
pub fn run(state: &mut AppState, app: &mut App) -> Result<()> {
    let (rows, cols) = state.terminal_size;
    // Create embedded terminal (may fail on some systems)
    let mut terminal_pty = match EmbeddedTerminal::new(rows, cols, app.shell.as_deref(), &state.workspace) {
        Ok(term) => Some(term),
        Err(e) => {
            warn!(error = %e, "Embedded terminal unavailable");
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    let mut terminal = Terminal::new(ratatui::backend::CrosstermBackend::new(stdout()))?;

    // Main loop
    let result = super::main_loop(&mut terminal, state, &mut terminal_pty, app);

    // Restore terminal
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}
