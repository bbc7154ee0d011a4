//! Configuration: an optional RON file overlaid with command-line flags.
//!
//! ```ron
//! Config(
//!     run_first: "clear",
//!     bypass_history: true,
//!     ignore: [".git", "target"],
//!     save_all_hook: Some("nvim --server /tmp/nvim.sock --remote-send ':wa<CR>'"),
//! )
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::actions::trigger::TriggerOptions;
use crate::error::{Error, Result};

const APP_DIR: &str = "onsave";

/// Settings read at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Line sent before every command; empty means none.
    pub run_first: String,
    /// Prefix sent lines with a space so the shell does not record them.
    pub bypass_history: bool,
    /// Path components whose changes never count as saves.
    pub ignore: Vec<String>,
    /// Shell command run before a manual trigger to get editors to save.
    pub save_all_hook: Option<String>,
    /// Program for the embedded terminal; the user's shell when unset.
    pub shell: Option<String>,
    /// Where the command history is kept.
    pub state_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            run_first: String::new(),
            bypass_history: false,
            ignore: vec![
                ".git".to_string(),
                "target".to_string(),
                "node_modules".to_string(),
            ],
            save_all_hook: None,
            shell: None,
            state_file: None,
        }
    }
}

/// Values given on the command line; `None`/`false` leave the file's value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub run_first: Option<String>,
    pub bypass_history: bool,
    pub shell: Option<String>,
    pub state_file: Option<PathBuf>,
}

impl Config {
    /// `<config_dir>/onsave/config.ron`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.ron"))
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        ron::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load an explicitly named file (which must exist) or the default one.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) if !path.exists() => Err(Error::Config {
                path: path.to_path_buf(),
                reason: "file not found".to_string(),
            }),
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) => Self::load(&path),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(run_first) = overrides.run_first {
            self.run_first = run_first;
        }
        if overrides.bypass_history {
            self.bypass_history = true;
        }
        if overrides.shell.is_some() {
            self.shell = overrides.shell;
        }
        if overrides.state_file.is_some() {
            self.state_file = overrides.state_file;
        }
    }

    pub fn trigger_options(&self) -> TriggerOptions {
        TriggerOptions {
            run_first: self.run_first.trim().to_string(),
            bypass_history: self.bypass_history,
        }
    }

    /// Configured state file, else `<data_dir>/onsave/state.ron`.
    pub fn state_file(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(|| data_dir().join("state.ron"))
    }
}

/// Default log file location.
pub fn default_log_file() -> PathBuf {
    data_dir().join("onsave.log")
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
