//! Bounded, recency-ordered command history.

use serde::{Deserialize, Serialize};

/// Maximum number of entries kept in the history.
pub const HISTORY_CAPACITY: usize = 10;

/// Most-recent-first list of previously accepted command strings.
///
/// Invariants: at most [`HISTORY_CAPACITY`] entries, no duplicates,
/// no blank entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct HistoryList {
    entries: Vec<String>,
}

impl HistoryList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.entries.iter().any(|e| e == value)
    }

    /// Produce the list after `value` was accepted: any previous occurrence
    /// is removed, `value` goes to the front, and the tail is truncated.
    pub fn record_acceptance(&self, value: &str) -> Self {
        let mut entries = Vec::with_capacity(HISTORY_CAPACITY);
        entries.push(value.to_string());
        entries.extend(
            self.entries
                .iter()
                .filter(|e| e.as_str() != value)
                .cloned(),
        );
        entries.truncate(HISTORY_CAPACITY);
        Self { entries }
    }
}

impl From<Vec<String>> for HistoryList {
    /// Normalise persisted entries: blanks and later duplicates are dropped,
    /// then the list is truncated.
    fn from(raw: Vec<String>) -> Self {
        let mut entries: Vec<String> = Vec::with_capacity(raw.len().min(HISTORY_CAPACITY));
        for entry in raw {
            if entry.trim().is_empty() || entries.contains(&entry) {
                continue;
            }
            entries.push(entry);
        }
        entries.truncate(HISTORY_CAPACITY);
        Self { entries }
    }
}

impl From<HistoryList> for Vec<String> {
    fn from(list: HistoryList) -> Self {
        list.entries
    }
}
