use tracing::debug;

use crate::{error::CalcResult, types::Number};

use super::traits::{Operation, ensure_nonzero_divisor};

/// `a + b`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Addition;

/// `a - b`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Subtraction;

/// `a * b`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Multiplication;

/// `a / b`, rejecting a zero divisor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Division;

/// `a` raised to `b` via [`f64::powf`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Power;

/// `a % b`, rejecting a zero divisor. The sign follows the dividend.
#[derive(Debug, Clone, Copy, Default)]
pub struct Modulus;

impl Operation for Addition {
    fn name(&self) -> &str {
        "addition"
    }

    fn calculate(&self, a: Number, b: Number) -> CalcResult<Number> {
        debug!(a, b, "performing addition");
        Ok(a + b)
    }
}

impl Operation for Subtraction {
    fn name(&self) -> &str {
        "subtraction"
    }

    fn calculate(&self, a: Number, b: Number) -> CalcResult<Number> {
        debug!(a, b, "performing subtraction");
        Ok(a - b)
    }
}

impl Operation for Multiplication {
    fn name(&self) -> &str {
        "multiplication"
    }

    fn calculate(&self, a: Number, b: Number) -> CalcResult<Number> {
        debug!(a, b, "performing multiplication");
        Ok(a * b)
    }
}

impl Operation for Division {
    fn name(&self) -> &str {
        "division"
    }

    fn calculate(&self, a: Number, b: Number) -> CalcResult<Number> {
        debug!(a, b, "performing division");
        ensure_nonzero_divisor(b)?;
        Ok(a / b)
    }
}

impl Operation for Power {
    fn name(&self) -> &str {
        "power"
    }

    fn calculate(&self, a: Number, b: Number) -> CalcResult<Number> {
        debug!(a, b, "performing power");
        Ok(a.powf(b))
    }
}

impl Operation for Modulus {
    fn name(&self) -> &str {
        "modulus"
    }

    fn calculate(&self, a: Number, b: Number) -> CalcResult<Number> {
        debug!(a, b, "performing modulus");
        ensure_nonzero_divisor(b)?;
        Ok(a % b)
    }
}
