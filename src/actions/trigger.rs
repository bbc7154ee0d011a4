//! Sending a command to the active terminal.

use std::fmt;
use std::io;

use tracing::{debug, info, warn};

use crate::data::command::Command;

/// The terminal a command is sent to.
pub trait TerminalSink {
    fn has_active_terminal(&mut self) -> bool;

    /// Interrupt whatever runs in the foreground (Ctrl+C).
    fn send_interrupt(&mut self) -> io::Result<()>;

    fn scroll_to_bottom(&mut self) -> io::Result<()>;

    /// Send `text`, followed by a carriage return when `submit` is set.
    fn send_line(&mut self, text: &str, submit: bool) -> io::Result<()>;

    /// Ask open documents to be saved. Best effort.
    fn request_save_all(&mut self) -> io::Result<()>;
}

/// Settings read from the configuration source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerOptions {
    /// Line sent before every command; skipped when empty.
    pub run_first: String,
    /// Prefix sent lines with a space so shells keep them out of history.
    pub bypass_history: bool,
}

impl TriggerOptions {
    fn line(&self, text: &str) -> String {
        if self.bypass_history {
            format!(" {}", text)
        } else {
            text.to_string()
        }
    }
}

/// What a trigger attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Nothing to do: no command, or a manual command on save.
    Skipped,
    NoTerminal,
    Sent,
    Failed(String),
}

impl fmt::Display for TriggerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerOutcome::Skipped => write!(f, "skipped"),
            TriggerOutcome::NoTerminal => write!(f, "no active terminal"),
            TriggerOutcome::Sent => write!(f, "sent"),
            TriggerOutcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Interrupt, scroll to bottom, optionally send the run-first line, then the
/// command itself.
pub fn send_command<T: TerminalSink + ?Sized>(
    sink: &mut T,
    command: &Command,
    options: &TriggerOptions,
) -> TriggerOutcome {
    if !sink.has_active_terminal() {
        debug!("No active terminal");
        return TriggerOutcome::NoTerminal;
    }

    info!(command = %command.value(), "Running");
    match send_sequence(sink, command, options) {
        Ok(()) => TriggerOutcome::Sent,
        Err(e) => {
            warn!(error = %e, "Failed to send command to terminal");
            TriggerOutcome::Failed(e.to_string())
        }
    }
}

fn send_sequence<T: TerminalSink + ?Sized>(
    sink: &mut T,
    command: &Command,
    options: &TriggerOptions,
) -> io::Result<()> {
    sink.send_interrupt()?;
    sink.scroll_to_bottom()?;
    if !options.run_first.is_empty() {
        sink.send_line(&options.line(&options.run_first), true)?;
    }
    sink.send_line(&options.line(command.value()), true)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// One call on the recording sink.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Call {
        Interrupt,
        Scroll,
        Line(String, bool),
        SaveAll,
    }

    /// Sink that records every call.
    #[derive(Debug)]
    pub(crate) struct RecordingSink {
        pub active: bool,
        pub fail_on_scroll: bool,
        pub fail_save_all: bool,
        pub calls: Vec<Call>,
    }

    impl RecordingSink {
        pub(crate) fn active() -> Self {
            Self {
                active: true,
                fail_on_scroll: false,
                fail_save_all: false,
                calls: Vec::new(),
            }
        }

        pub(crate) fn inactive() -> Self {
            Self {
                active: false,
                ..Self::active()
            }
        }

        pub(crate) fn lines(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Line(text, _) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl TerminalSink for RecordingSink {
        fn has_active_terminal(&mut self) -> bool {
            self.active
        }

        fn send_interrupt(&mut self) -> io::Result<()> {
            self.calls.push(Call::Interrupt);
            Ok(())
        }

        fn scroll_to_bottom(&mut self) -> io::Result<()> {
            self.calls.push(Call::Scroll);
            if self.fail_on_scroll {
                return Err(io::Error::other("scroll failed"));
            }
            Ok(())
        }

        fn send_line(&mut self, text: &str, submit: bool) -> io::Result<()> {
            self.calls.push(Call::Line(text.to_string(), submit));
            Ok(())
        }

        fn request_save_all(&mut self) -> io::Result<()> {
            self.calls.push(Call::SaveAll);
            if self.fail_save_all {
                return Err(io::Error::other("2 documents could not be saved"));
            }
            Ok(())
        }
    }

    fn cmd(text: &str) -> Command {
        Command::from_text(text, false).unwrap()
    }

    #[test]
    fn test_sequence_without_run_first() {
        let mut sink = RecordingSink::active();
        let outcome = send_command(&mut sink, &cmd("x"), &TriggerOptions::default());
        assert_eq!(outcome, TriggerOutcome::Sent);
        assert_eq!(
            sink.calls,
            vec![Call::Interrupt, Call::Scroll, Call::Line("x".to_string(), true)]
        );
    }

    #[test]
    fn test_sequence_with_run_first() {
        let mut sink = RecordingSink::active();
        let options = TriggerOptions {
            run_first: "clear".to_string(),
            bypass_history: false,
        };
        send_command(&mut sink, &cmd("cargo test"), &options);
        assert_eq!(
            sink.calls,
            vec![
                Call::Interrupt,
                Call::Scroll,
                Call::Line("clear".to_string(), true),
                Call::Line("cargo test".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_bypass_history_prefixes_every_line() {
        let mut sink = RecordingSink::active();
        let options = TriggerOptions {
            run_first: "clear".to_string(),
            bypass_history: true,
        };
        send_command(&mut sink, &cmd("make"), &options);
        assert_eq!(sink.lines(), vec![" clear", " make"]);
    }

    #[test]
    fn test_no_terminal_sends_nothing() {
        let mut sink = RecordingSink::inactive();
        let outcome = send_command(&mut sink, &cmd("x"), &TriggerOptions::default());
        assert_eq!(outcome, TriggerOutcome::NoTerminal);
        assert!(sink.calls.is_empty());
    }

    #[test]
    fn test_failure_stops_sequence_and_is_reported() {
        let mut sink = RecordingSink::active();
        sink.fail_on_scroll = true;
        let outcome = send_command(&mut sink, &cmd("x"), &TriggerOptions::default());
        assert_eq!(outcome, TriggerOutcome::Failed("scroll failed".to_string()));
        assert_eq!(sink.calls, vec![Call::Interrupt, Call::Scroll]);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(TriggerOutcome::Sent.to_string(), "sent");
        assert_eq!(
            TriggerOutcome::Failed("boom".to_string()).to_string(),
            "failed: boom"
        );
    }
}
