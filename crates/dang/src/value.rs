//! Runtime value representation.
//!
//! Values are a small tagged union. Strings and compiled function chunks are
//! shared, immutable, and reference counted (`Rc`), so copying a value never
//! copies its backing storage. Equality is structural and type-strict:
//! `Int(3)` never equals `Double(3.0)`.

use std::{fmt, rc::Rc};

use crate::{
    bytecode::Chunk,
    error::{DangResult, Error, ErrorKind},
    expressions::BinOp,
};

/// A runtime value.
///
/// The default value is `Null`.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(Rc<str>),
    Function(Function),
}

/// A named first-class function.
///
/// Functions are immutable once compiled; every reference to the same
/// definition shares one chunk.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: Rc<str>,
    pub arity: usize,
    pub chunk: Rc<Chunk>,
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.arity == other.arity && Rc::ptr_eq(&self.chunk, &other.chunk)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Returns the type name used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::Str(_) => "string",
            Self::Function(_) => "function",
        }
    }

    /// Truthiness for conditional branching.
    ///
    /// `Int` 0, `Double` 0.0, the empty string, `false`, and `null` are
    /// falsy; everything else (including every function) is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(v) => *v != 0,
            Self::Double(v) => *v != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::Function(_) => true,
        }
    }

    /// Applies `self OP rhs` under the coercion laws.
    ///
    /// Two ints produce an int (division truncates toward zero; a zero
    /// divisor is an error). Any double operand promotes both sides to
    /// double. `+` on two strings concatenates. Every other combination is
    /// a type error naming both operand types.
    pub fn binary_op(&self, op: BinOp, rhs: &Self) -> DangResult<Self> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => match op {
                BinOp::Add => Ok(Self::Int(a.wrapping_add(*b))),
                BinOp::Subtract => Ok(Self::Int(a.wrapping_sub(*b))),
                BinOp::Multiply => Ok(Self::Int(a.wrapping_mul(*b))),
                BinOp::Divide => {
                    if *b == 0 {
                        Err(Error::new(ErrorKind::ZeroDivision, "integer division by zero"))
                    } else {
                        Ok(Self::Int(a.wrapping_div(*b)))
                    }
                }
            },
            (Self::Int(_) | Self::Double(_), Self::Int(_) | Self::Double(_)) => {
                let a = self.as_double();
                let b = rhs.as_double();
                let result = match op {
                    BinOp::Add => a + b,
                    BinOp::Subtract => a - b,
                    BinOp::Multiply => a * b,
                    BinOp::Divide => a / b,
                };
                Ok(Self::Double(result))
            }
            (Self::Str(a), Self::Str(b)) if op == BinOp::Add => {
                let mut concatenated = String::with_capacity(a.len() + b.len());
                concatenated.push_str(a);
                concatenated.push_str(b);
                Ok(Self::Str(concatenated.into()))
            }
            _ => Err(Error::new(
                ErrorKind::Type,
                format!(
                    "invalid operands to {}: {} and {}",
                    op.symbol(),
                    self.type_name(),
                    rhs.type_name()
                ),
            )),
        }
    }

    /// Numeric value of an `Int` or `Double`.
    ///
    /// # Panics
    ///
    /// Panics on non-numeric values; callers check `is_numeric` combinations
    /// before coercing.
    fn as_double(&self) -> f64 {
        match self {
            Self::Int(v) => *v as f64,
            Self::Double(v) => *v,
            _ => unreachable!("as_double on non-numeric value"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Double(v) => f.write_str(&double_repr(*v)),
            Self::Str(s) => f.write_str(s),
            Self::Function(function) => write!(f, "#<Function({})>", function.name),
        }
    }
}

/// Returns the display form of a double.
///
/// Uses the `ryu` crate, which produces the shortest decimal representation
/// that round-trips through `f64` parsing, so `7.5` displays as `7.5` and
/// `3.0` keeps its trailing `.0`. Special values display as `nan`, `inf`
/// and `-inf`.
fn double_repr(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        return if value.is_sign_negative() { "-inf" } else { "inf" }.to_owned();
    }

    let mut buffer = ryu::Buffer::new();
    buffer.format(value).to_owned()
}
