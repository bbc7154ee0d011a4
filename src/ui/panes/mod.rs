pub mod picker;
pub mod terminal;
