//! State changes without side effects.

pub mod keymap;
pub mod ui;
