//! Transforms for UI state changes.

use std::time::Instant;

use chrono::Local;

use crate::actions::trigger::TriggerOutcome;
use crate::data::state::{AppState, LastRun, StatusNotice, TriggerReason};

/// Show a notice until its time-to-live runs out.
pub fn show_notice(state: &mut AppState, notice: StatusNotice, now: Instant) {
    let expires = now + notice.ttl;
    state.notice = Some((notice, expires));
}

/// Drop the notice once it has expired.
pub fn expire_notice(state: &mut AppState, now: Instant) {
    if matches!(state.notice, Some((_, expires)) if now >= expires) {
        state.notice = None;
    }
}

/// Remember a trigger that reached the terminal logic.
pub fn record_run(state: &mut AppState, reason: TriggerReason, outcome: TriggerOutcome) {
    if outcome == TriggerOutcome::Skipped {
        return;
    }
    state.last_run = Some(LastRun {
        at: Local::now(),
        reason,
        outcome,
    });
}

/// Toggle theme between dark and light.
pub fn toggle_theme(state: &mut AppState) {
    state.theme = state.theme.toggle();
}

pub fn toggle_help(state: &mut AppState) {
    state.show_help = !state.show_help;
}

pub fn request_quit(state: &mut AppState) {
    state.should_quit = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::state::Theme;
    use std::path::PathBuf;
    use std::time::Duration;

    fn make_state() -> AppState {
        AppState::new(PathBuf::from("/work"))
    }

    #[test]
    fn test_notice_expires() {
        let mut state = make_state();
        let now = Instant::now();
        show_notice(
            &mut state,
            StatusNotice::new("Disabled", Duration::from_secs(2)),
            now,
        );

        expire_notice(&mut state, now + Duration::from_secs(1));
        assert_eq!(state.notice.as_ref().map(|(n, _)| n.text.as_str()), Some("Disabled"));

        expire_notice(&mut state, now + Duration::from_secs(2));
        assert!(state.notice.is_none());
    }

    #[test]
    fn test_new_notice_replaces_old() {
        let mut state = make_state();
        let now = Instant::now();
        show_notice(&mut state, StatusNotice::new("a", Duration::from_secs(2)), now);
        show_notice(&mut state, StatusNotice::new("b", Duration::from_secs(2)), now);
        assert_eq!(state.notice.as_ref().map(|(n, _)| n.text.as_str()), Some("b"));
    }

    #[test]
    fn test_record_run_ignores_skips() {
        let mut state = make_state();
        record_run(&mut state, TriggerReason::Save, TriggerOutcome::Skipped);
        assert!(state.last_run.is_none());

        record_run(&mut state, TriggerReason::Manual, TriggerOutcome::NoTerminal);
        let last = state.last_run.as_ref().unwrap();
        assert_eq!(last.reason, TriggerReason::Manual);
        assert_eq!(last.outcome, TriggerOutcome::NoTerminal);
    }

    #[test]
    fn test_toggles() {
        let mut state = make_state();
        toggle_theme(&mut state);
        assert_eq!(state.theme, Theme::Light);
        toggle_help(&mut state);
        assert!(state.show_help);
        request_quit(&mut state);
        assert!(state.should_quit);
    }
}
