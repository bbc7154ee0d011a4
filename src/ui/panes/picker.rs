//! Command picker overlay rendering.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::data::session::SelectionSession;
use crate::data::state::AppState;
use crate::queries::view::{list_offset, picker_rows};

/// Label of the "run manually" button in the top border.
pub const MANUAL_BUTTON: &str = "[▶ manual]";

const PLACEHOLDER: &str = "Enter a terminal command, or press Esc to disable";
const MAX_WIDTH: u16 = 80;
const MAX_ROWS: u16 = 10;

/// Screen regions of the overlay, for mouse handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerAreas {
    pub overlay: Rect,
    pub list: Rect,
    /// Index of the item drawn on the first list row.
    pub offset: usize,
    pub button: Rect,
}

impl PickerAreas {
    /// Item index under a click at row `y`, if the click hit the list.
    pub fn item_at(&self, x: u16, y: u16) -> Option<usize> {
        if self.list.contains((x, y).into()) {
            Some(self.offset + (y - self.list.y) as usize)
        } else {
            None
        }
    }
}

/// Column of the text cursor after `buffer`, if it fits on the input line.
fn input_cursor_x(inner: Rect, buffer: &str) -> Option<u16> {
    let typed = u16::try_from(buffer.chars().count()).unwrap_or(u16::MAX);
    let cursor_x = inner.x.saturating_add(2).saturating_add(typed);
    (cursor_x < inner.x.saturating_add(inner.width)).then_some(cursor_x)
}

/// Draw the picker centred near the top of `area`.
pub fn draw(frame: &mut Frame, state: &AppState, session: &SelectionSession, area: Rect) -> PickerAreas {
    let theme = state.theme;
    let rows = picker_rows(session);

    let width = area.width.saturating_sub(4).min(MAX_WIDTH);
    let list_rows = (rows.len() as u16).clamp(1, MAX_ROWS);
    // Border, input line and separator around the list.
    let height = (list_rows + 4).min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + 1;
    let overlay = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent()))
        .title(" Run on save ")
        .title(
            Line::from(Span::styled(
                MANUAL_BUTTON,
                Style::default().fg(theme.accent()).add_modifier(Modifier::BOLD),
            ))
            .right_aligned(),
        )
        .title_bottom(" Enter on save │ Tab manual │ Esc disable ")
        .style(Style::default().bg(theme.bg()).fg(theme.fg()));
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    let input = if session.buffer().is_empty() {
        Line::from(vec![
            Span::raw("> "),
            Span::styled(PLACEHOLDER, Style::default().fg(theme.dim())),
        ])
    } else {
        Line::from(format!("> {}", session.buffer()))
    };
    let input_area = Rect::new(inner.x, inner.y, inner.width, inner.height.min(1));
    frame.render_widget(Paragraph::new(input), input_area);
    if inner.height > 0 {
        if let Some(cursor_x) = input_cursor_x(inner, session.buffer()) {
            frame.set_cursor_position((cursor_x, inner.y));
        }
    }

    let list = Rect::new(
        inner.x,
        inner.y.saturating_add(2),
        inner.width,
        inner.height.saturating_sub(2),
    );
    if inner.height > 1 {
        let separator = "─".repeat(inner.width as usize);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(separator, Style::default().fg(theme.dim())))),
            Rect::new(inner.x, inner.y + 1, inner.width, 1),
        );
    }

    let offset = list_offset(rows.len(), session.active(), list.height as usize);
    let lines: Vec<Line> = if rows.is_empty() {
        vec![Line::from(Span::styled(
            "No history yet",
            Style::default().fg(theme.dim()),
        ))]
    } else {
        rows.iter()
            .skip(offset)
            .take(list.height as usize)
            .map(|row| {
                let style = if row.active {
                    Style::default()
                        .bg(theme.selection_bg())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let mut spans = vec![Span::styled(format!(" {}", row.label), style)];
                if row.synthetic {
                    spans.push(Span::styled("  (new)", Style::default().fg(theme.dim())));
                }
                Line::from(spans)
            })
            .collect()
    };
    frame.render_widget(Paragraph::new(lines), list);

    let button_width = MANUAL_BUTTON.chars().count() as u16;
    let button = Rect::new(
        (overlay.x + overlay.width).saturating_sub(button_width + 1),
        overlay.y,
        button_width,
        1,
    );

    PickerAreas {
        overlay,
        list,
        offset,
        button,
    }
}
