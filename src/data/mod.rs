//! Pure data types.

pub mod command;
pub mod effect;
pub mod history;
pub mod session;
pub mod state;
