//! Calculation records and the history ledger.

/// Calculation record and evaluation state.
pub mod calculation;
/// Ordered, undoable, persistable ledger.
pub mod history;

pub use calculation::{Calculation, Evaluation};
pub use history::{History, HistoryError};
