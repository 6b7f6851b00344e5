//! Normalized dispatcher return values.

use crate::{core::Calculation, types::Number};

/// Everything [`super::calculator::Calculator::execute_command`] can return.
///
/// Errors arrive as [`Output::Message`] prefixed with `"Error: "`; callers
/// branch on the variant, not on a separate success flag.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Result of an arithmetic command.
    Number(Number),
    /// Informational or error text.
    Message(String),
    /// Snapshot of the ledger for the `history` command.
    History(Vec<Calculation>),
}

impl Output {
    /// Wraps an error as `"Error: {err}"`.
    pub fn error(err: impl std::fmt::Display) -> Self {
        Self::Message(format!("Error: {err}"))
    }

    /// Numeric result, if any.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Message text, if any.
    pub fn as_message(&self) -> Option<&str> {
        match self {
            Self::Message(s) => Some(s),
            _ => None,
        }
    }

    /// Ledger snapshot, if any.
    pub fn as_history(&self) -> Option<&[Calculation]> {
        match self {
            Self::History(h) => Some(h),
            _ => None,
        }
    }
}
