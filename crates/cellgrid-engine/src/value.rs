//! The value a cell evaluates to: text, a finite number, or an error.

use std::fmt;

/// A cell's evaluated value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Error(CellError),
}

impl Value {
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Error(e) => write!(f, "{e}"),
        }
    }
}

/// An evaluation-time error living inside a cell's [`Value`].
///
/// `Circ` is reserved: cycles are rejected when a cell is written (see the
/// sheet's `set_cell`), so a formula is never evaluated while part of one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellError {
    Ref,
    Value,
    Div0,
    Circ,
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            CellError::Ref => "#REF!",
            CellError::Value => "#VALUE!",
            CellError::Div0 => "#DIV/0!",
            CellError::Circ => "#CIRC!",
        };
        write!(f, "{token}")
    }
}

/// Shortest round-trippable, locale-independent decimal representation of a
/// finite number. Rust's own `f64` formatter already produces the shortest
/// round-trippable decimal with no exponent and no trailing zeros; the only
/// adjustment needed is collapsing negative zero to "0".
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else {
        format!("{n}")
    }
}
