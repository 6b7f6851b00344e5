//! Error taxonomy for operations and command dispatch.

use thiserror::Error;

/// Failures raised while validating, evaluating, or dispatching a calculation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// No handler is registered under the command name.
    #[error("Unknown command '{0}'.")]
    UnknownCommand(String),

    /// An operation command received the wrong number of operands.
    #[error("Invalid number of arguments. Please provide two numbers.")]
    InvalidArity {
        /// Operands required by the command.
        expected: usize,
        /// Operands actually supplied.
        got: usize,
    },

    /// At least one operand was not an integer or float.
    #[error("Invalid types: a is {a}, b is {b}. Expected int or float.")]
    InvalidOperand {
        /// Kind of the first operand.
        a: &'static str,
        /// Kind of the second operand.
        b: &'static str,
    },

    /// Division or modulus with a zero divisor.
    #[error("Cannot divide by zero")]
    DivisionByZero,

    /// `save` or `load` was given something other than one file path.
    #[error("Expected a single file path, got {0}.")]
    InvalidPath(String),

    /// An operation implementation panicked.
    #[error("operation '{operation}' failed unexpectedly: {message}")]
    Panicked {
        /// Operation name.
        operation: String,
        /// Panic payload, when it was a string.
        message: String,
    },
}

/// Result alias for [`CalcError`].
pub type CalcResult<T> = Result<T, CalcError>;
