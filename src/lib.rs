//! onsave: a TUI terminal that re-runs a picked command whenever a file is saved.

pub mod actions;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod queries;
pub mod transforms;
pub mod ui;
pub mod watch;
