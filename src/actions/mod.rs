//! Side-effecting operations: persistence, prompting and terminal traffic.

pub mod controller;
pub mod history;
pub mod picker;
pub mod pty;
pub mod store;
pub mod trigger;
