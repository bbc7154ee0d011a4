//! Read-only projections used by the renderers.

use crate::actions::controller::TriggerController;
use crate::actions::trigger::TriggerOutcome;
use crate::data::session::SelectionSession;
use crate::data::state::{AppState, TriggerReason};

/// One line of the picker list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerRow<'a> {
    pub label: &'a str,
    pub active: bool,
    pub synthetic: bool,
}

/// Rows of the picker list, top first.
pub fn picker_rows(session: &SelectionSession) -> Vec<PickerRow<'_>> {
    session
        .items()
        .iter()
        .enumerate()
        .map(|(i, label)| PickerRow {
            label,
            active: session.active() == Some(i),
            synthetic: i == 0 && session.has_synthetic(),
        })
        .collect()
}

/// First row to draw so that `active` stays inside a window of `height` rows.
pub fn list_offset(len: usize, active: Option<usize>, height: usize) -> usize {
    if height == 0 || len <= height {
        return 0;
    }
    match active {
        Some(i) if i >= height => (i + 1 - height).min(len - height),
        _ => 0,
    }
}

/// Describe the current command for the status bar.
pub fn command_label(controller: &TriggerController) -> String {
    match controller.current() {
        None => "disabled".to_string(),
        Some(cmd) if cmd.is_manual() => format!("{} [manual]", cmd.value()),
        Some(cmd) => format!("{} [on save]", cmd.value()),
    }
}

/// Describe the last trigger, e.g. `14:03:22 save: sent`.
pub fn last_run_label(state: &AppState) -> Option<String> {
    state.last_run.as_ref().map(|run| {
        let reason = match run.reason {
            TriggerReason::Save => "save",
            TriggerReason::Manual => "manual",
        };
        format!("{} {}: {}", run.at.format("%H:%M:%S"), reason, run.outcome)
    })
}

/// Whether the last trigger should be highlighted as a problem.
pub fn last_run_failed(state: &AppState) -> bool {
    matches!(
        state.last_run.as_ref().map(|r| &r.outcome),
        Some(TriggerOutcome::Failed(_)) | Some(TriggerOutcome::NoTerminal)
    )
}

/// The notice currently on screen, if any.
pub fn notice_text(state: &AppState) -> Option<&str> {
    state.notice.as_ref().map(|(n, _)| n.text.as_str())
}
