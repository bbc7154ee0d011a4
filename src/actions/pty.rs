//! The embedded PTY as a trigger target.

use std::io;
use std::path::Path;
use std::process::{Command as Process, Stdio};

use tracing::{debug, warn};

use super::trigger::TerminalSink;
use crate::ui::panes::terminal::EmbeddedTerminal;

/// Sends trigger traffic to the embedded terminal.
///
/// Save-all is delegated to an optional shell hook, since the documents
/// live in whatever editor the user runs next to us.
pub struct PtySink<'a> {
    terminal: Option<&'a mut EmbeddedTerminal>,
    save_all_hook: Option<&'a str>,
    workspace: &'a Path,
}

impl<'a> PtySink<'a> {
    pub fn new(
        terminal: Option<&'a mut EmbeddedTerminal>,
        save_all_hook: Option<&'a str>,
        workspace: &'a Path,
    ) -> Self {
        Self {
            terminal,
            save_all_hook,
            workspace,
        }
    }

    fn terminal(&mut self) -> io::Result<&mut EmbeddedTerminal> {
        self.terminal
            .as_deref_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "no terminal"))
    }
}

impl TerminalSink for PtySink<'_> {
    fn has_active_terminal(&mut self) -> bool {
        self.terminal.as_deref_mut().is_some_and(EmbeddedTerminal::is_alive)
    }

    fn send_interrupt(&mut self) -> io::Result<()> {
        self.terminal()?.send_bytes(b"\x03")
    }

    fn scroll_to_bottom(&mut self) -> io::Result<()> {
        self.terminal()?.scroll_to_bottom();
        Ok(())
    }

    fn send_line(&mut self, text: &str, submit: bool) -> io::Result<()> {
        let term = self.terminal()?;
        term.send_bytes(text.as_bytes())?;
        if submit {
            term.send_bytes(b"\r")?;
        }
        Ok(())
    }

    fn request_save_all(&mut self) -> io::Result<()> {
        let Some(hook) = self.save_all_hook else {
            return Ok(());
        };
        run_hook(hook, self.workspace)
    }
}

/// Run a shell snippet in `dir`; a non-zero exit is an error.
///
/// The hook never sees the TUI's terminal: stdin and stdout are closed and
/// stderr is captured for the log.
fn run_hook(hook: &str, dir: &Path) -> io::Result<()> {
    debug!(hook, "Running save-all hook");
    let output = shell(hook)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()?;
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    warn!(hook, status = %output.status, stderr, "Save-all hook failed");
    if stderr.is_empty() {
        Err(io::Error::other(format!("save-all hook exited with {}", output.status)))
    } else {
        Err(io::Error::other(format!(
            "save-all hook exited with {}: {}",
            output.status, stderr
        )))
    }
}

#[cfg(unix)]
fn shell(script: &str) -> Process {
    let mut cmd = Process::new("sh");
    cmd.arg("-c").arg(script);
    cmd
}

#[cfg(windows)]
fn shell(script: &str) -> Process {
    let mut cmd = Process::new("cmd");
    cmd.arg("/C").arg(script);
    cmd
}
