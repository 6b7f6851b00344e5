use std::fmt;

use crate::{
    error::{CalcError, CalcResult},
    types::{Number, Operand},
};

/// A named binary arithmetic capability.
///
/// Implementations are stateless and shared as `Arc<dyn Operation>`.
pub trait Operation: Send + Sync + fmt::Debug {
    /// Lowercase identity used in textual form and persisted rows.
    fn name(&self) -> &str;

    /// Computes the result for two already-validated operands.
    fn calculate(&self, a: Number, b: Number) -> CalcResult<Number>;

    /// Validates raw operands, then calls [`Operation::calculate`].
    fn evaluate(&self, a: &Operand, b: &Operand) -> CalcResult<Number> {
        let (a, b) = validate_operands(a, b)?;
        self.calculate(a, b)
    }
}

/// Shared operand check: both values must be integers or floats.
pub fn validate_operands(a: &Operand, b: &Operand) -> CalcResult<(Number, Number)> {
    match (a.as_number(), b.as_number()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(CalcError::InvalidOperand {
            a: a.kind(),
            b: b.kind(),
        }),
    }
}

/// Rejects a zero divisor.
pub fn ensure_nonzero_divisor(b: Number) -> CalcResult<()> {
    if b == 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    Ok(())
}
