//! The command value that gets re-sent to the terminal.

use std::fmt;

/// An accepted shell command.
///
/// `manual` commands only fire on an explicit trigger, never on save.
/// The text is always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    value: String,
    manual: bool,
}

impl Command {
    /// Build a command from user text. Returns `None` for blank text.
    pub(crate) fn from_text(text: &str, manual: bool) -> Option<Self> {
        let value = text.trim();
        if value.is_empty() {
            return None;
        }
        Some(Self {
            value: value.to_string(),
            manual,
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_manual(&self) -> bool {
        self.manual
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.manual {
            write!(f, "{} (manual)", self.value)
        } else {
            write!(f, "{}", self.value)
        }
    }
}
