//! Arithmetic operations and their registration table.

/// Built-in arithmetic operations.
pub mod builtin;
/// Declarative registration table and name lookup.
pub mod registry;
/// Operation trait and shared operand validation.
pub mod traits;

pub use registry::{OperationEntry, OperationLookup, OperationRegistry};
pub use traits::Operation;
