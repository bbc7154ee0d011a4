//! The picker overlay driven by real terminal input.

use std::io::Stdout;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::debug;

use super::panes::picker::PickerAreas;
use super::panes::terminal::EmbeddedTerminal;
use crate::actions::picker::Picker;
use crate::data::session::{AcceptTrigger, PickerEvent, SelectionSession};
use crate::data::state::AppState;
use crate::error::Result;
use crate::transforms::keymap::picker_event;
use crate::transforms::ui as ui_transforms;

/// Draws the overlay on top of the full screen and reads keys and clicks.
///
/// The shell keeps running underneath, so its output is still polled.
pub struct TuiPicker<'a> {
    terminal: &'a mut Terminal<CrosstermBackend<Stdout>>,
    state: &'a mut AppState,
    pty: &'a mut Option<EmbeddedTerminal>,
    /// Status-bar label, fixed while the picker is open.
    label: String,
    areas: Option<PickerAreas>,
}

impl<'a> TuiPicker<'a> {
    pub fn new(
        terminal: &'a mut Terminal<CrosstermBackend<Stdout>>,
        state: &'a mut AppState,
        pty: &'a mut Option<EmbeddedTerminal>,
        label: String,
    ) -> Self {
        Self {
            terminal,
            state,
            pty,
            label,
            areas: None,
        }
    }

    fn mouse_event(&self, mouse: MouseEvent) -> Option<PickerEvent> {
        let areas = self.areas?;
        let (x, y) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if areas.button.contains((x, y).into()) {
                    Some(PickerEvent::Accept(AcceptTrigger::Auxiliary))
                } else if let Some(index) = areas.item_at(x, y) {
                    Some(PickerEvent::Select(index))
                } else if areas.overlay.contains((x, y).into()) {
                    None
                } else {
                    // Clicking away hides the picker.
                    Some(PickerEvent::Dismiss)
                }
            }
            MouseEventKind::ScrollUp if areas.overlay.contains((x, y).into()) => {
                Some(PickerEvent::Up)
            }
            MouseEventKind::ScrollDown if areas.overlay.contains((x, y).into()) => {
                Some(PickerEvent::Down)
            }
            _ => None,
        }
    }
}

impl Picker for TuiPicker<'_> {
    fn render(&mut self, session: &SelectionSession) -> Result<()> {
        if let Some(term) = self.pty.as_mut() {
            term.poll_output();
        }
        ui_transforms::expire_notice(self.state, Instant::now());

        let state = &*self.state;
        let pty = &*self.pty;
        let label = self.label.as_str();
        let mut areas = None;
        self.terminal.draw(|frame| {
            areas = super::draw(frame, state, pty, label, Some(session)).picker;
        })?;
        self.areas = areas;
        Ok(())
    }

    fn next_event(&mut self, timeout: Duration) -> Result<Option<PickerEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        let picked = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                picker_event(key.code, key.modifiers)
            }
            Event::Mouse(mouse) => self.mouse_event(mouse),
            _ => None,
        };
        Ok(picked)
    }

    fn release(&mut self) {
        // The next frame of the main loop paints over the overlay.
        self.areas = None;
        debug!("Picker closed");
    }
}
