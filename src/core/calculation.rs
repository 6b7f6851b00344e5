use std::{fmt, sync::Arc};

use crate::{
    error::CalcResult,
    operations::{Operation, traits::validate_operands},
    types::{Number, Operand},
};

/// Whether a calculation has produced its result yet.
#[derive(Debug, Clone, Copy, Default)]
pub enum Evaluation {
    /// Not executed.
    #[default]
    Unevaluated,
    /// Executed (or restored) with this result.
    Evaluated(Number),
}

impl Evaluation {
    /// The result, if any.
    pub fn value(self) -> Option<Number> {
        match self {
            Self::Unevaluated => None,
            Self::Evaluated(n) => Some(n),
        }
    }
}

impl PartialEq for Evaluation {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unevaluated, Self::Unevaluated) => true,
            (Self::Evaluated(a), Self::Evaluated(b)) => same_number(*a, *b),
            _ => false,
        }
    }
}

/// Bitwise equality, except that every NaN matches every other NaN.
///
/// A stored `NaN` reloads with the canonical bit pattern, which need not
/// match the one the operation produced.
fn same_number(a: Number, b: Number) -> bool {
    a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
}

/// One operation bound to two operands.
#[derive(Debug, Clone)]
pub struct Calculation {
    operation: Arc<dyn Operation>,
    operand1: Number,
    operand2: Number,
    evaluation: Evaluation,
}

impl Calculation {
    /// Binds `operation` to two operands, rejecting non-numeric ones.
    pub fn new(
        operation: Arc<dyn Operation>,
        operand1: impl Into<Operand>,
        operand2: impl Into<Operand>,
    ) -> CalcResult<Self> {
        let (operand1, operand2) = validate_operands(&operand1.into(), &operand2.into())?;
        Ok(Self::from_numbers(operation, operand1, operand2))
    }

    /// Binds `operation` to operands that are already numbers.
    pub fn from_numbers(operation: Arc<dyn Operation>, operand1: Number, operand2: Number) -> Self {
        Self {
            operation,
            operand1,
            operand2,
            evaluation: Evaluation::Unevaluated,
        }
    }

    /// Runs the operation and stores the result.
    ///
    /// Each call recomputes; callers are expected to execute once.
    pub fn execute(&mut self) -> CalcResult<Number> {
        let result = self.operation.calculate(self.operand1, self.operand2)?;
        self.evaluation = Evaluation::Evaluated(result);
        Ok(result)
    }

    /// Pre-sets the result without running the operation.
    pub fn set_result(&mut self, result: Number) {
        self.evaluation = Evaluation::Evaluated(result);
    }

    /// Bound operation.
    pub fn operation(&self) -> &Arc<dyn Operation> {
        &self.operation
    }

    /// Lowercased operation name.
    pub fn operation_name(&self) -> String {
        self.operation.name().to_lowercase()
    }

    /// First operand.
    pub fn operand1(&self) -> Number {
        self.operand1
    }

    /// Second operand.
    pub fn operand2(&self) -> Number {
        self.operand2
    }

    /// Evaluation state.
    pub fn evaluation(&self) -> Evaluation {
        self.evaluation
    }

    /// Stored result, if executed.
    pub fn result(&self) -> Option<Number> {
        self.evaluation.value()
    }
}

impl PartialEq for Calculation {
    fn eq(&self, other: &Self) -> bool {
        self.operation.name() == other.operation.name()
            && same_number(self.operand1, other.operand1)
            && same_number(self.operand2, other.operand2)
            && self.evaluation == other.evaluation
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} = ",
            self.operand1,
            self.operation_name(),
            self.operand2
        )?;
        match self.evaluation {
            Evaluation::Evaluated(result) => write!(f, "{result}"),
            Evaluation::Unevaluated => f.write_str("Not calculated"),
        }
    }
}
