//! State machine for one interactive pick-or-type cycle.
//!
//! The session owns three pieces of transient state: the free-text buffer,
//! the active-item pointer and the displayed item set. Two reactions are
//! deferred so that "text changed" and "active item changed" cannot feed
//! into each other:
//!
//! - typing restarts a quiescence timer; only when it expires is the buffer
//!   materialised as a synthetic top entry;
//! - moving the pointer adopts the item's text into the buffer one tick
//!   later, without counting as an edit.
//!
//! Time is passed in by the caller, so the machine is fully deterministic.

use std::time::{Duration, Instant};

use super::command::Command;
use super::history::HistoryList;

/// Quiet period after the last keystroke before the synthetic entry appears.
pub const SYNTHESIS_DELAY: Duration = Duration::from_millis(150);

/// Which control accepted the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptTrigger {
    /// Enter.
    Primary,
    /// The "run manually" control.
    Auxiliary,
}

/// Input understood by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    Insert(char),
    Backspace,
    DeleteWord,
    ClearText,
    Up,
    Down,
    First,
    Last,
    /// Pointer set directly, e.g. by a mouse click.
    Select(usize),
    Accept(AcceptTrigger),
    Dismiss,
}

/// Pending deferred action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    PendingSynthesis { due: Instant },
    Navigating,
}

/// How the session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Accepted(Command),
    Cancelled,
}

impl Resolution {
    pub fn into_command(self) -> Option<Command> {
        match self {
            Resolution::Accepted(cmd) => Some(cmd),
            Resolution::Cancelled => None,
        }
    }
}

/// One selection cycle.
#[derive(Debug)]
pub struct SelectionSession {
    history: Vec<String>,
    items: Vec<String>,
    synthetic: bool,
    buffer: String,
    active: Option<usize>,
    phase: Phase,
    resolution: Option<Resolution>,
}

impl SelectionSession {
    pub fn new(history: &HistoryList) -> Self {
        let history = history.entries().to_vec();
        Self {
            items: history.clone(),
            history,
            synthetic: false,
            buffer: String::new(),
            active: None,
            phase: Phase::Idle,
            resolution: None,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the top item is the synthesised free-text entry.
    pub fn has_synthetic(&self) -> bool {
        self.synthetic
    }

    pub fn is_settled(&self) -> bool {
        self.resolution.is_some()
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    pub fn take_resolution(&mut self) -> Option<Resolution> {
        self.resolution.take()
    }

    /// How long the caller may wait for input before calling [`Self::tick`].
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        match self.phase {
            Phase::Idle => None,
            Phase::Navigating => Some(Duration::ZERO),
            Phase::PendingSynthesis { due } => Some(due.saturating_duration_since(now)),
        }
    }

    /// Apply one input event. Ignored once the session has resolved.
    pub fn handle(&mut self, event: PickerEvent, now: Instant) {
        if self.is_settled() {
            return;
        }
        match event {
            PickerEvent::Insert(c) => {
                self.buffer.push(c);
                self.edited(now);
            }
            PickerEvent::Backspace => {
                if self.buffer.pop().is_some() {
                    self.edited(now);
                }
            }
            PickerEvent::DeleteWord => {
                let kept = self.buffer.trim_end();
                let cut = kept
                    .char_indices()
                    .rev()
                    .find(|(_, c)| c.is_whitespace())
                    .map(|(i, c)| i + c.len_utf8())
                    .unwrap_or(0);
                if cut != self.buffer.len() {
                    self.buffer.truncate(cut);
                    self.edited(now);
                }
            }
            PickerEvent::ClearText => {
                if !self.buffer.is_empty() {
                    self.buffer.clear();
                    self.edited(now);
                }
            }
            PickerEvent::Up => {
                let target = self.active.map(|i| i.saturating_sub(1)).unwrap_or(0);
                self.navigate(target);
            }
            PickerEvent::Down => {
                let target = self.active.map(|i| i + 1).unwrap_or(0);
                self.navigate(target);
            }
            PickerEvent::First => self.navigate(0),
            PickerEvent::Last => self.navigate(self.items.len().saturating_sub(1)),
            PickerEvent::Select(index) => self.navigate(index),
            PickerEvent::Accept(trigger) => self.accept(trigger),
            PickerEvent::Dismiss => self.settle(Resolution::Cancelled),
        }
    }

    /// Run whichever deferred action is due.
    pub fn tick(&mut self, now: Instant) {
        if self.is_settled() {
            return;
        }
        match self.phase {
            Phase::Idle => {}
            Phase::Navigating => {
                if let Some(text) = self.active.and_then(|i| self.items.get(i)) {
                    self.buffer = text.clone();
                }
                self.phase = Phase::Idle;
            }
            Phase::PendingSynthesis { due } => {
                if now >= due {
                    self.synthesize();
                    self.phase = Phase::Idle;
                }
            }
        }
    }

    /// Cancel any pending deferred action. Called on every exit path.
    pub fn dispose(&mut self) {
        self.phase = Phase::Idle;
    }

    fn edited(&mut self, now: Instant) {
        self.active = None;
        self.phase = Phase::PendingSynthesis {
            due: now + SYNTHESIS_DELAY,
        };
    }

    fn navigate(&mut self, target: usize) {
        if self.items.is_empty() {
            return;
        }
        self.active = Some(target.min(self.items.len() - 1));
        self.phase = Phase::Navigating;
    }

    fn synthesize(&mut self) {
        let typed = self.buffer.trim();
        self.items = self.history.clone();
        self.synthetic = !typed.is_empty() && !self.history.iter().any(|e| e == typed);
        if self.synthetic {
            self.items.insert(0, typed.to_string());
        }
        // Any pointer into the old item set is meaningless now.
        self.active = None;
    }

    fn accept(&mut self, trigger: AcceptTrigger) {
        let manual = trigger == AcceptTrigger::Auxiliary;
        let text = match self.active.and_then(|i| self.items.get(i)) {
            Some(item) => item.as_str(),
            None => self.buffer.as_str(),
        };
        let resolution = match Command::from_text(text, manual) {
            Some(cmd) => Resolution::Accepted(cmd),
            None => Resolution::Cancelled,
        };
        self.settle(resolution);
    }

    fn settle(&mut self, resolution: Resolution) {
        if self.resolution.is_none() {
            self.resolution = Some(resolution);
            self.dispose();
        }
    }
}
