//! Pure data types for application state.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use ratatui::style::Color;

use crate::actions::trigger::TriggerOutcome;

/// Theme for the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn bg(self) -> Color {
        match self {
            Theme::Dark => Color::Black,
            Theme::Light => Color::White,
        }
    }

    pub fn fg(self) -> Color {
        match self {
            Theme::Dark => Color::White,
            Theme::Light => Color::Black,
        }
    }

    pub fn dim(self) -> Color {
        match self {
            Theme::Dark => Color::DarkGray,
            Theme::Light => Color::Gray,
        }
    }

    pub fn selection_bg(self) -> Color {
        match self {
            Theme::Dark => Color::DarkGray,
            Theme::Light => Color::LightBlue,
        }
    }

    pub fn accent(self) -> Color {
        match self {
            Theme::Dark => Color::Cyan,
            Theme::Light => Color::Blue,
        }
    }
}

/// A short-lived message for the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusNotice {
    pub text: String,
    pub ttl: Duration,
}

impl StatusNotice {
    pub fn new(text: impl Into<String>, ttl: Duration) -> Self {
        Self {
            text: text.into(),
            ttl,
        }
    }
}

/// Why a command was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    Save,
    Manual,
}

/// The most recent trigger that did something.
#[derive(Debug, Clone)]
pub struct LastRun {
    pub at: DateTime<Local>,
    pub reason: TriggerReason,
    pub outcome: TriggerOutcome,
}

/// Pure application state. No methods with side effects.
pub struct AppState {
    /// Directory whose saves trigger the command.
    pub workspace: PathBuf,
    pub should_quit: bool,
    // Terminal pane inner size (rows, cols)
    pub terminal_size: (u16, u16),
    // Notice and the instant it disappears
    pub notice: Option<(StatusNotice, Instant)>,
    pub last_run: Option<LastRun>,
    // Rows scrolled back from the bottom of the terminal
    pub scrollback: usize,
    pub show_help: bool,
    pub theme: Theme,
}

impl AppState {
    pub fn new(workspace: PathBuf) -> Self {
        Self {
            workspace,
            should_quit: false,
            terminal_size: (24, 80),
            notice: None,
            last_run: None,
            scrollback: 0,
            show_help: false,
            theme: Theme::Dark,
        }
    }
}
