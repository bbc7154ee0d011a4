//! Save notifications from a recursive filesystem watch.
//!
//! Editors produce several filesystem events per save (temp file, rename,
//! metadata). Events are filtered, then debounced so one save produces one
//! [`SaveEvent`].

use std::path::{Component, Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::error::Result;

/// Events closer together than this count as the same save.
const DEBOUNCE_DURATION: Duration = Duration::from_millis(100);

/// A document was saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEvent {
    pub path: PathBuf,
}

/// Decides which filesystem events are saves.
#[derive(Debug, Clone, Default)]
pub struct SaveFilter {
    /// Path components that exclude a path anywhere below them.
    ignore: Vec<String>,
    /// Exact files whose changes are ours, not the user's.
    excluded: Vec<PathBuf>,
}

impl SaveFilter {
    pub fn new(ignore: Vec<String>, excluded: Vec<PathBuf>) -> Self {
        Self { ignore, excluded }
    }

    /// The first saved path in `event`, if it is a save at all.
    pub fn saved_path<'a>(&self, event: &'a Event) -> Option<&'a Path> {
        let relevant = match event.kind {
            EventKind::Create(_) => true,
            EventKind::Modify(ModifyKind::Metadata(_)) => false,
            EventKind::Modify(_) => true,
            _ => false,
        };
        if !relevant {
            return None;
        }
        event
            .paths
            .iter()
            .map(PathBuf::as_path)
            .find(|p| self.accepts(p))
    }

    fn accepts(&self, path: &Path) -> bool {
        if self.excluded.iter().any(|e| e == path) {
            return false;
        }
        let ignored = path.components().any(|c| match c {
            Component::Normal(name) => self.ignore.iter().any(|i| name == i.as_str()),
            _ => false,
        });
        !ignored && !is_editor_scratch(path)
    }
}

/// Swap, backup and probe files editors write next to the real one.
fn is_editor_scratch(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with('~')
        || name.ends_with(".swp")
        || name.ends_with(".swx")
        || name.starts_with(".#")
        || name == "4913"
}

/// Watches a directory tree and yields save events.
pub struct SaveWatcher {
    /// The underlying file watcher (kept alive to maintain watching)
    _watcher: RecommendedWatcher,
    root: PathBuf,
    rx: Receiver<SaveEvent>,
}

impl SaveWatcher {
    pub fn new(root: &Path, filter: SaveFilter) -> Result<Self> {
        let root = root.canonicalize()?;
        let (tx, rx) = mpsc::channel();

        // Start in the past so the first save is never debounced.
        let last_save = Arc::new(Mutex::new(
            Instant::now()
                .checked_sub(DEBOUNCE_DURATION)
                .unwrap_or_else(Instant::now),
        ));

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    let Some(path) = filter.saved_path(&event) else {
                        return;
                    };
                    {
                        let mut last = last_save
                            .lock()
                            .unwrap_or_else(std::sync::PoisonError::into_inner);
                        if last.elapsed() < DEBOUNCE_DURATION {
                            debug!(path = %path.display(), "Debouncing save event");
                            return;
                        }
                        *last = Instant::now();
                    }
                    debug!(path = %path.display(), "Save detected");
                    // The receiver is gone only while shutting down.
                    let _ = tx.send(SaveEvent {
                        path: path.to_path_buf(),
                    });
                }
                Err(e) => {
                    warn!(error = %e, "File watch error");
                }
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;
        info!(path = %root.display(), "Watching for saves");

        Ok(Self {
            _watcher: watcher,
            root,
            rx,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Collapse every pending save into one. `None` if nothing was saved.
    pub fn drain(&self) -> Option<SaveEvent> {
        self.rx.try_iter().last()
    }
}
