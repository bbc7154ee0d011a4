//! Driving a [`SelectionSession`] against an interactive picker.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::history::HistoryStore;
use super::store::StateStore;
use crate::data::command::Command;
use crate::data::history::HistoryList;
use crate::data::session::{PickerEvent, SelectionSession};
use crate::error::Result;

/// How long to wait for input when no deferred action is pending.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// The interactive list-picker primitive.
pub trait Picker {
    /// Draw the current session state.
    fn render(&mut self, session: &SelectionSession) -> Result<()>;

    /// Wait up to `timeout` for the next input event.
    fn next_event(&mut self, timeout: Duration) -> Result<Option<PickerEvent>>;

    /// Give the picker resource back. Called exactly once per prompt.
    fn release(&mut self);
}

/// Run one selection cycle seeded with `history`.
///
/// Resolves to `None` when the picker is dismissed or the accepted text is
/// blank. The session's deferred actions are cancelled and the picker is
/// released on every exit path.
pub fn prompt<P: Picker>(history: &HistoryList, picker: &mut P) -> Result<Option<Command>> {
    let mut session = SelectionSession::new(history);
    let result = drive(&mut session, picker);
    session.dispose();
    picker.release();
    result
}

fn drive<P: Picker>(session: &mut SelectionSession, picker: &mut P) -> Result<Option<Command>> {
    loop {
        picker.render(session)?;

        let timeout = session
            .next_wakeup(Instant::now())
            .map(|d| d.min(IDLE_POLL))
            .unwrap_or(IDLE_POLL);
        if let Some(event) = picker.next_event(timeout)? {
            session.handle(event, Instant::now());
        }
        session.tick(Instant::now());

        if let Some(resolution) = session.take_resolution() {
            return Ok(resolution.into_command());
        }
    }
}

/// Prompt with the persisted history and record an accepted command.
///
/// A picker failure is logged and treated as a dismissal.
pub fn prompt_with_history<S: StateStore, P: Picker>(
    store: &mut HistoryStore<S>,
    picker: &mut P,
) -> Option<Command> {
    let history = store.load();
    let selected = match prompt(&history, picker) {
        Ok(selected) => selected,
        Err(e) => {
            warn!(error = %e, "Command picker failed");
            None
        }
    };
    debug!(selected = ?selected, "Picker resolved");
    if let Some(ref cmd) = selected {
        store.record_acceptance(&history, cmd.value());
    }
    selected
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::actions::history::HISTORY_KEY;
    use crate::actions::store::tests::MemoryStore;
    use crate::data::session::AcceptTrigger;
    use crate::error::Error;
    use std::collections::VecDeque;

    /// Picker that replays a fixed script of events.
    #[derive(Default)]
    pub(crate) struct ScriptedPicker {
        pub events: VecDeque<Option<PickerEvent>>,
        pub fail_after_script: bool,
        pub renders: usize,
        pub released: usize,
        pub last_items: Vec<String>,
    }

    impl ScriptedPicker {
        pub(crate) fn new(events: Vec<PickerEvent>) -> Self {
            Self {
                events: events.into_iter().map(Some).collect(),
                ..Self::default()
            }
        }

        pub(crate) fn typing(text: &str, accept: AcceptTrigger) -> Self {
            let mut events: Vec<PickerEvent> = text.chars().map(PickerEvent::Insert).collect();
            events.push(PickerEvent::Accept(accept));
            Self::new(events)
        }
    }

    impl Picker for ScriptedPicker {
        fn render(&mut self, session: &SelectionSession) -> Result<()> {
            self.renders += 1;
            self.last_items = session.items().to_vec();
            Ok(())
        }

        fn next_event(&mut self, timeout: Duration) -> Result<Option<PickerEvent>> {
            match self.events.pop_front() {
                // An idle poll waits out the timeout like a real picker.
                Some(None) => {
                    std::thread::sleep(timeout);
                    Ok(None)
                }
                Some(event) => Ok(event),
                None if self.fail_after_script => {
                    Err(Error::Io(std::io::Error::other("picker went away")))
                }
                None => Ok(Some(PickerEvent::Dismiss)),
            }
        }

        fn release(&mut self) {
            self.released += 1;
        }
    }

    fn history(items: &[&str]) -> HistoryList {
        HistoryList::from(items.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn test_prompt_empty_accept_is_none() {
        let mut picker = ScriptedPicker::new(vec![PickerEvent::Accept(AcceptTrigger::Primary)]);
        let result = prompt(&history(&["build"]), &mut picker).unwrap();
        assert!(result.is_none());
        assert_eq!(picker.released, 1);
    }

    #[test]
    fn test_prompt_active_item_auxiliary() {
        let mut picker = ScriptedPicker::new(vec![
            PickerEvent::Down,
            PickerEvent::Accept(AcceptTrigger::Auxiliary),
        ]);
        let cmd = prompt(&history(&["build", "test"]), &mut picker)
            .unwrap()
            .unwrap();
        assert_eq!(cmd.value(), "build");
        assert!(cmd.is_manual());
    }

    #[test]
    fn test_prompt_typed_text_primary() {
        let mut picker = ScriptedPicker::typing("npm test", AcceptTrigger::Primary);
        let cmd = prompt(&history(&["build"]), &mut picker).unwrap().unwrap();
        assert_eq!(cmd.value(), "npm test");
        assert!(!cmd.is_manual());
    }

    #[test]
    fn test_prompt_dismiss_releases_picker() {
        let mut picker = ScriptedPicker::new(vec![PickerEvent::Insert('x'), PickerEvent::Dismiss]);
        assert!(prompt(&history(&[]), &mut picker).unwrap().is_none());
        assert_eq!(picker.released, 1);
        assert!(picker.events.is_empty());
    }

    #[test]
    fn test_prompt_stops_reading_after_resolution() {
        let mut picker = ScriptedPicker::new(vec![
            PickerEvent::Dismiss,
            PickerEvent::Accept(AcceptTrigger::Primary),
        ]);
        assert!(prompt(&history(&["a"]), &mut picker).unwrap().is_none());
        assert_eq!(picker.events.len(), 1);
    }

    #[test]
    fn test_prompt_materialises_after_quiet_period() {
        let mut events = vec![Some(PickerEvent::Insert('z'))];
        events.extend(std::iter::repeat(None).take(5));
        events.push(Some(PickerEvent::Accept(AcceptTrigger::Primary)));
        let mut picker = ScriptedPicker {
            events: events.into(),
            ..ScriptedPicker::default()
        };

        let cmd = prompt(&history(&["a"]), &mut picker).unwrap().unwrap();
        assert_eq!(cmd.value(), "z");
        assert_eq!(picker.last_items, vec!["z", "a"]);
    }

    #[test]
    fn test_prompt_error_still_releases() {
        let mut picker = ScriptedPicker {
            events: VecDeque::from(vec![Some(PickerEvent::Insert('x'))]),
            fail_after_script: true,
            ..ScriptedPicker::default()
        };
        assert!(prompt(&history(&[]), &mut picker).is_err());
        assert_eq!(picker.released, 1);
    }

    #[test]
    fn test_prompt_with_history_records_acceptance() {
        let mut store = MemoryStore::new();
        store.insert_raw(HISTORY_KEY, r#"["a","b"]"#);
        let mut history = HistoryStore::new(store);
        let mut picker = ScriptedPicker::typing("c", AcceptTrigger::Primary);

        let cmd = prompt_with_history(&mut history, &mut picker).unwrap();
        assert_eq!(cmd.value(), "c");
        assert_eq!(history.current().entries(), &["c", "a", "b"]);
        assert_eq!(history.store().raw(HISTORY_KEY), Some(r#"["c","a","b"]"#));
    }

    #[test]
    fn test_prompt_with_history_untouched_on_cancel() {
        let mut store = MemoryStore::new();
        store.insert_raw(HISTORY_KEY, r#"["a","b"]"#);
        let mut history = HistoryStore::new(store);
        let mut picker = ScriptedPicker::new(vec![PickerEvent::Down, PickerEvent::Dismiss]);

        assert!(prompt_with_history(&mut history, &mut picker).is_none());
        assert_eq!(history.store().raw(HISTORY_KEY), Some(r#"["a","b"]"#));
    }

    #[test]
    fn test_prompt_with_history_error_is_cancel() {
        let mut history = HistoryStore::new(MemoryStore::new());
        let mut picker = ScriptedPicker {
            fail_after_script: true,
            ..ScriptedPicker::default()
        };
        assert!(prompt_with_history(&mut history, &mut picker).is_none());
        assert!(history.store().raw(HISTORY_KEY).is_none());
        assert_eq!(picker.released, 1);
    }
}
