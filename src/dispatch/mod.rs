//! Command dispatch and normalized outputs.

/// Dispatcher mapping command names to operations and control actions.
pub mod calculator;
/// Dispatcher return type.
pub mod output;

pub use calculator::{Calculator, ControlCommand, EXIT_MESSAGE};
pub use output::Output;
