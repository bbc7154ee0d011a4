//! Side-effect descriptions returned by transforms.

/// Effects that the UI layer should execute.
/// Transforms return these instead of performing side effects directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Open the command picker and make its result current.
    Configure,
    /// Save everything and run the current command now.
    Trigger,
    /// Quit the application.
    Quit,
}
