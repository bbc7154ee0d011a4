//! The "current command" slot and its reactions to trigger events.

use std::time::Duration;

use tracing::{info, warn};

use super::history::HistoryStore;
use super::picker::{prompt_with_history, Picker};
use super::store::StateStore;
use super::trigger::{send_command, TerminalSink, TriggerOptions, TriggerOutcome};
use crate::data::command::Command;
use crate::data::state::StatusNotice;

/// How long the configuration notice stays in the status bar.
pub const NOTICE_TTL: Duration = Duration::from_millis(2000);

/// Holds the command to re-run and decides when to run it.
///
/// Constructed once per process; the UI loop owns it and hands it to every
/// event handler by `&mut`.
#[derive(Debug, Default)]
pub struct TriggerController {
    current: Option<Command>,
    options: TriggerOptions,
}

impl TriggerController {
    pub fn new(options: TriggerOptions) -> Self {
        Self {
            current: None,
            options,
        }
    }

    pub fn current(&self) -> Option<&Command> {
        self.current.as_ref()
    }

    pub fn options(&self) -> &TriggerOptions {
        &self.options
    }

    /// Replace the current command. `None` disables triggering.
    pub fn set_command(&mut self, command: Option<Command>) -> StatusNotice {
        let text = match &command {
            None => "Disabled",
            Some(cmd) if cmd.is_manual() => "Manual run configured",
            Some(_) => "Run on save configured",
        };
        info!(command = ?command.as_ref().map(Command::value), "{}", text);
        self.current = command;
        StatusNotice::new(text, NOTICE_TTL)
    }

    /// A document was saved.
    pub fn on_save_event<T: TerminalSink + ?Sized>(&self, sink: &mut T) -> TriggerOutcome {
        match &self.current {
            Some(cmd) if !cmd.is_manual() => send_command(sink, cmd, &self.options),
            _ => TriggerOutcome::Skipped,
        }
    }

    /// The user asked to run the command now, manual or not.
    pub fn on_manual_request<T: TerminalSink + ?Sized>(&self, sink: &mut T) -> TriggerOutcome {
        let Some(cmd) = &self.current else {
            return TriggerOutcome::Skipped;
        };
        if let Err(e) = sink.request_save_all() {
            warn!(error = %e, "Save-all request failed, running anyway");
        }
        send_command(sink, cmd, &self.options)
    }

    /// Let the user pick a new command and make it current.
    pub fn on_reconfigure_request<S: StateStore, P: Picker>(
        &mut self,
        history: &mut HistoryStore<S>,
        picker: &mut P,
    ) -> StatusNotice {
        let selected = prompt_with_history(history, picker);
        self.set_command(selected)
    }
}
