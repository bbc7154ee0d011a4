//! Terminal pane rendering and embedded PTY management.

use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{debug, info};

use crate::data::state::AppState;
use crate::error::{Error, Result};

/// Lines of history kept above the visible screen.
const SCROLLBACK_LINES: usize = 5000;

/// Manages an embedded terminal with PTY.
pub struct EmbeddedTerminal {
    master: Box<dyn MasterPty + Send>,
    writer: Box<dyn Write + Send>,
    child: Box<dyn Child + Send + Sync>,
    parser: vt100::Parser,
    output_rx: Receiver<Vec<u8>>,
}

impl EmbeddedTerminal {
    /// Spawn `shell` (or the user's default shell) in `cwd`.
    pub fn new(rows: u16, cols: u16, shell: Option<&str>, cwd: &Path) -> Result<Self> {
        let pty_system = native_pty_system();

        let pty_pair = pty_system
            .openpty(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| Error::Pty(e.to_string()))?;

        let mut cmd = match shell {
            Some(program) => CommandBuilder::new(program),
            None => CommandBuilder::new_default_prog(),
        };
        cmd.cwd(cwd);
        let child = pty_pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| Error::Pty(e.to_string()))?;

        let writer = pty_pair
            .master
            .take_writer()
            .map_err(|e| Error::Pty(e.to_string()))?;

        let mut reader = pty_pair
            .master
            .try_clone_reader()
            .map_err(|e| Error::Pty(e.to_string()))?;
        let (tx, rx): (Sender<Vec<u8>>, Receiver<Vec<u8>>) = mpsc::channel();

        thread::spawn(move || {
            let mut buf = [0u8; 4096];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
            debug!("Terminal output closed");
        });

        info!(shell = shell.unwrap_or("<default>"), "Spawned terminal");

        Ok(Self {
            master: pty_pair.master,
            writer,
            child,
            parser: vt100::Parser::new(rows, cols, SCROLLBACK_LINES),
            output_rx: rx,
        })
    }

    /// Resize the terminal.
    pub fn resize(&mut self, rows: u16, cols: u16) {
        let _ = self.master.resize(PtySize {
            rows,
            cols,
            pixel_width: 0,
            pixel_height: 0,
        });
        self.parser.set_size(rows, cols);
    }

    /// Process any pending output from the PTY.
    pub fn poll_output(&mut self) {
        while let Ok(data) = self.output_rx.try_recv() {
            self.parser.process(&data);
        }
    }

    /// Whether the shell is still running.
    pub fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Write raw bytes to the PTY.
    pub fn send_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes)?;
        self.writer.flush()
    }

    /// Send a keystroke; errors are dropped like a terminal drops input to a dead shell.
    pub fn send_key(&mut self, key: &[u8]) {
        let _ = self.send_bytes(key);
    }

    /// Move the view `delta` rows back into history (negative moves forward).
    pub fn scroll_by(&mut self, delta: isize) {
        let current = self.parser.screen().scrollback();
        let target = current.saturating_add_signed(delta);
        self.parser.set_scrollback(target);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.parser.set_scrollback(0);
    }

    /// Rows currently scrolled back from the bottom.
    pub fn scrollback(&self) -> usize {
        self.parser.screen().scrollback()
    }

    /// Get the current screen contents.
    pub fn screen(&self) -> &vt100::Screen {
        self.parser.screen()
    }
}

impl Drop for EmbeddedTerminal {
    fn drop(&mut self) {
        if self.is_alive() {
            let _ = self.child.kill();
        }
    }
}

/// Draw the terminal pane.
pub fn draw(frame: &mut Frame, state: &AppState, terminal: &Option<EmbeddedTerminal>, area: Rect) {
    let theme = state.theme;
    let border_style = Style::default().fg(theme.accent());

    let title = if state.scrollback > 0 {
        format!(
            " {} (scrolled back {} lines, Shift+PgDn) ",
            state.workspace.display(),
            state.scrollback
        )
    } else {
        format!(" {} ", state.workspace.display())
    };

    let content: Vec<Line> = if let Some(ref term) = terminal {
        let screen = term.screen();
        let inner_height = area.height.saturating_sub(2) as usize;
        let mut lines: Vec<Line> = screen
            .rows(0, screen.size().1)
            .take(inner_height)
            .map(|row| Line::from(row.trim_end().to_string()))
            .collect();

        if lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines
    } else {
        vec![
            Line::from("Terminal not available"),
            Line::from(""),
            Line::from("Saves are still detected; commands cannot be sent."),
        ]
    };

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );

    frame.render_widget(paragraph, area);

    if let Some(ref term) = terminal {
        let screen = term.screen();
        if state.scrollback == 0 && !screen.hide_cursor() {
            let cursor_pos = screen.cursor_position();
            let cursor_x = area.x + 1 + cursor_pos.1;
            let cursor_y = area.y + 1 + cursor_pos.0;
            if cursor_x < area.x + area.width - 1 && cursor_y < area.y + area.height - 1 {
                frame.set_cursor_position((cursor_x, cursor_y));
            }
        }
    }
}
