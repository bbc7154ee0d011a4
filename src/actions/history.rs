//! Loading and persisting the command history.

use tracing::{debug, warn};

use super::store::StateStore;
use crate::data::history::HistoryList;

/// Key under which the history lives in the state store.
pub const HISTORY_KEY: &str = "history";

/// Owns the canonical history and writes it through to a [`StateStore`].
///
/// Storage failures never propagate: a bad read yields an empty list and a
/// failed write is logged while the in-memory list stays authoritative.
pub struct HistoryStore<S: StateStore> {
    store: S,
    current: HistoryList,
}

impl<S: StateStore> HistoryStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            current: HistoryList::new(),
        }
    }

    /// Read the persisted list; absent or corrupt state is an empty list.
    pub fn load(&mut self) -> HistoryList {
        self.current = match self.store.get::<HistoryList>(HISTORY_KEY) {
            Ok(Some(list)) => list,
            Ok(None) => HistoryList::new(),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable command history");
                HistoryList::new()
            }
        };
        debug!(entries = self.current.len(), "Loaded command history");
        self.current.clone()
    }

    /// Move `value` to the front of `list`, persist and return the result.
    pub fn record_acceptance(&mut self, list: &HistoryList, value: &str) -> HistoryList {
        let updated = list.record_acceptance(value);
        if let Err(e) = self.store.set(HISTORY_KEY, &updated) {
            warn!(error = %e, "Failed to persist command history");
        }
        self.current = updated.clone();
        updated
    }

    /// The list as of the last load or acceptance.
    pub fn current(&self) -> &HistoryList {
        &self.current
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
