//! UI layer: event loop, key/mouse dispatch, and rendering coordination.

pub mod app;
pub mod panes;
pub mod picker;

use std::io::Stdout;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tracing::info;

use crate::actions::pty::PtySink;
use crate::data::effect::Effect;
use crate::data::session::SelectionSession;
use crate::data::state::{AppState, TriggerReason};
use crate::error::Result;
use crate::queries::view::{command_label, last_run_failed, last_run_label, notice_text};
use crate::transforms::keymap::{route_key, KeyRoute};
use crate::transforms::ui as ui_transforms;
use crate::watch::SaveEvent;
use app::App;
use panes::picker::PickerAreas;
use panes::terminal::EmbeddedTerminal;
use picker::TuiPicker;

/// Rows moved by one mouse wheel notch.
const WHEEL_STEP: isize = 3;

/// Stores layout information for mouse and resize handling.
pub(crate) struct LayoutAreas {
    terminal_pane: Rect,
    picker: Option<PickerAreas>,
}

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: &mut AppState,
    pty: &mut Option<EmbeddedTerminal>,
    app: &mut App,
) -> Result<()> {
    let mut layout_areas: Option<LayoutAreas> = None;

    while !state.should_quit {
        if let Some(ref mut term) = pty {
            term.poll_output();
            state.scrollback = term.scrollback();
        }
        ui_transforms::expire_notice(state, Instant::now());

        if let Some(save) = app.watcher.as_ref().and_then(|w| w.drain()) {
            handle_save(state, pty, app, save);
        }

        let label = command_label(&app.controller);
        terminal.draw(|frame| {
            layout_areas = Some(draw(frame, state, pty, &label, None));
        })?;

        if let Some(ref areas) = layout_areas {
            let new_rows = areas.terminal_pane.height.saturating_sub(2);
            let new_cols = areas.terminal_pane.width.saturating_sub(2);
            if (new_rows, new_cols) != state.terminal_size {
                state.terminal_size = (new_rows, new_cols);
                if let Some(ref mut term) = pty {
                    term.resize(new_rows, new_cols);
                }
            }
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press {
                        handle_key(terminal, state, pty, app, key.code, key.modifiers)?;
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(ref mut term) = pty {
                        match mouse.kind {
                            MouseEventKind::ScrollUp => term.scroll_by(WHEEL_STEP),
                            MouseEventKind::ScrollDown => term.scroll_by(-WHEEL_STEP),
                            _ => {}
                        }
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_save(
    state: &mut AppState,
    pty: &mut Option<EmbeddedTerminal>,
    app: &App,
    save: SaveEvent,
) {
    let outcome = {
        let mut sink = PtySink::new(pty.as_mut(), app.save_all_hook.as_deref(), &state.workspace);
        app.controller.on_save_event(&mut sink)
    };
    info!(path = %save.path.display(), %outcome, "Save");
    ui_transforms::record_run(state, TriggerReason::Save, outcome);
}

fn handle_key(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: &mut AppState,
    pty: &mut Option<EmbeddedTerminal>,
    app: &mut App,
    key: KeyCode,
    modifiers: KeyModifiers,
) -> Result<()> {
    // The help popup swallows the key that closes it.
    if state.show_help {
        ui_transforms::toggle_help(state);
        return Ok(());
    }

    match route_key(key, modifiers) {
        KeyRoute::Effect(effect) => run_effect(terminal, state, pty, app, effect)?,
        KeyRoute::ToggleTheme => ui_transforms::toggle_theme(state),
        KeyRoute::ToggleHelp => ui_transforms::toggle_help(state),
        KeyRoute::Scroll(delta) => {
            if let Some(ref mut term) = pty {
                term.scroll_by(delta);
            }
        }
        KeyRoute::Terminal(bytes) => {
            if let Some(ref mut term) = pty {
                term.scroll_to_bottom();
                term.send_key(&bytes);
            }
        }
        KeyRoute::Ignore => {}
    }
    Ok(())
}

fn run_effect(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: &mut AppState,
    pty: &mut Option<EmbeddedTerminal>,
    app: &mut App,
    effect: Effect,
) -> Result<()> {
    match effect {
        Effect::Configure => {
            let label = command_label(&app.controller);
            let notice = {
                let mut picker = TuiPicker::new(terminal, state, pty, label);
                app.controller
                    .on_reconfigure_request(&mut app.history, &mut picker)
            };
            info!(command = %command_label(&app.controller), "Command configured");
            ui_transforms::show_notice(state, notice, Instant::now());
        }
        Effect::Trigger => {
            let outcome = {
                let mut sink =
                    PtySink::new(pty.as_mut(), app.save_all_hook.as_deref(), &state.workspace);
                app.controller.on_manual_request(&mut sink)
            };
            info!(%outcome, "Manual run");
            ui_transforms::record_run(state, TriggerReason::Manual, outcome);
        }
        Effect::Quit => ui_transforms::request_quit(state),
    }
    Ok(())
}

pub(crate) fn draw(
    frame: &mut Frame,
    state: &AppState,
    pty: &Option<EmbeddedTerminal>,
    label: &str,
    session: Option<&SelectionSession>,
) -> LayoutAreas {
    let size = frame.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(size);

    panes::terminal::draw(frame, state, pty, main_chunks[0]);
    draw_status_bar(frame, state, label, main_chunks[1]);

    let picker = session.map(|s| panes::picker::draw(frame, state, s, main_chunks[0]));

    if state.show_help && picker.is_none() {
        draw_help(frame, state, size);
    }

    LayoutAreas {
        terminal_pane: main_chunks[0],
        picker,
    }
}

fn draw_help(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = state.theme;
    let dialog_width = 46;
    let dialog_height = 11;
    let x = area.width.saturating_sub(dialog_width) / 2;
    let y = area.height.saturating_sub(dialog_height) / 2;
    let dialog_area = Rect::new(x, y, dialog_width.min(area.width), dialog_height.min(area.height));

    frame.render_widget(Clear, dialog_area);

    let text = vec![
        Line::from(" F2 / Ctrl+O   Pick the command"),
        Line::from(" F5            Save all and run now"),
        Line::from(" Shift+PgUp    Scroll back"),
        Line::from(" Shift+PgDn    Scroll forward"),
        Line::from(" F9            Toggle theme"),
        Line::from(" F10           Quit"),
        Line::from(""),
        Line::from(" Other keys go to the shell."),
        Line::from(" Press any key to close."),
    ];

    let dialog = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent()))
                .title(" Keys "),
        )
        .style(Style::default().bg(theme.bg()).fg(theme.fg()));

    frame.render_widget(dialog, dialog_area);
}

fn draw_status_bar(frame: &mut Frame, state: &AppState, label: &str, area: Rect) {
    let theme = state.theme;
    let base = Style::default().bg(theme.selection_bg()).fg(theme.fg());

    let mut spans = vec![Span::styled(
        format!(" {} ", label),
        base.add_modifier(Modifier::BOLD),
    )];
    if let Some(notice) = notice_text(state) {
        spans.push(Span::raw("│ "));
        spans.push(Span::styled(format!("{} ", notice), base.fg(theme.accent())));
    } else if let Some(run) = last_run_label(state) {
        let style = if last_run_failed(state) {
            base.fg(ratatui::style::Color::Red)
        } else {
            base.fg(theme.dim())
        };
        spans.push(Span::raw("│ "));
        spans.push(Span::styled(format!("{} ", run), style));
    }
    spans.push(Span::raw("│ [F2] Command [F5] Run [F1] Help [F10] Quit "));

    let paragraph = Paragraph::new(Line::from(spans)).style(base);
    frame.render_widget(paragraph, area);
}
