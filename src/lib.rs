//! Two-operand calculator with pluggable operations and an undoable,
//! persistable history ledger.
//!
//! # Examples
//!
//! Dispatching commands through [`dispatch::Calculator`]:
//! ```
//! use calclog::{dispatch::{Calculator, Output}, types::Operand};
//!
//! let mut calc = Calculator::new();
//! assert_eq!(calc.execute_command("add", &[Operand::Int(3), Operand::Int(5)]), Output::Number(8.0));
//!
//! let Output::History(entries) = calc.execute_command("history", &[]) else {
//!     panic!("history returns the ledger");
//! };
//! assert_eq!(entries[0].to_string(), "3 addition 5 = 8");
//!
//! let out = calc.execute_command("divide", &[Operand::Int(1), Operand::Int(0)]);
//! assert_eq!(out, Output::Message("Error: Cannot divide by zero".to_string()));
//! ```
//!
//! Registering an extra operation without touching the dispatcher:
//! ```
//! use std::sync::Arc;
//! use calclog::{
//!     dispatch::{Calculator, Output},
//!     error::CalcResult,
//!     operations::{Operation, OperationEntry, OperationRegistry, registry::BUILTIN_OPERATIONS},
//!     persist::Destination,
//!     types::{Number, Operand},
//! };
//!
//! #[derive(Debug)]
//! struct Hypot;
//!
//! impl Operation for Hypot {
//!     fn name(&self) -> &str { "hypot" }
//!     fn calculate(&self, a: Number, b: Number) -> CalcResult<Number> { Ok(a.hypot(b)) }
//! }
//!
//! fn hypot() -> Arc<dyn Operation> { Arc::new(Hypot) }
//!
//! let registry = OperationRegistry::from_entries(
//!     BUILTIN_OPERATIONS.iter().cloned().chain([OperationEntry::new("hypot", "Length of the hypotenuse", hypot)]),
//! );
//! let mut calc = Calculator::with_registry(registry, Destination::default());
//! assert_eq!(calc.execute_command("hypot", &[Operand::Int(3), Operand::Int(4)]), Output::Number(5.0));
//! ```
#![deny(missing_docs)]

/// Line parsing and framed output for the interactive loop.
pub mod cli;
/// Layered configuration.
pub mod config;
/// Calculation records and the history ledger.
pub mod core;
/// Command dispatcher.
pub mod dispatch;
/// Calculation and dispatch errors.
pub mod error;
/// Operation trait, built-ins and registry.
pub mod operations;
/// History persistence.
pub mod persist;
/// Logging setup.
pub mod telemetry;
/// Shared numeric and operand types.
pub mod types;
