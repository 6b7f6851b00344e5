//! Shared numeric alias and the caller-facing operand value.

use std::fmt;

/// Native numeric type for operands and results.
pub type Number = f64;

/// A single argument handed to the dispatcher.
///
/// Only [`Operand::Int`] and [`Operand::Float`] are numeric. The other
/// variants exist so callers can pass whatever they tokenized and let the
/// operations reject it.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Integer input.
    Int(i64),
    /// Floating-point input.
    Float(f64),
    /// Any non-numeric token.
    Text(String),
    /// Absent value.
    Null,
}

impl Operand {
    /// Returns the numeric value, or `None` for non-numeric operands.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Int(v) => Some(*v as Number),
            Self::Float(v) => Some(*v),
            Self::Text(_) | Self::Null => None,
        }
    }

    /// Short type name used in validation messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Null => f.write_str("null"),
        }
    }
}

macro_rules! operand_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Operand {
            fn from(value: $t) -> Self {
                Self::Int(i64::from(value))
            }
        })*
    };
}

operand_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Operand {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Operand {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Operand {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Operand>> From<Option<T>> for Operand {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
