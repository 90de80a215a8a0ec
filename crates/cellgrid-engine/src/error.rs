//! Edit-time error types surfaced by the formula parser.

use thiserror::Error;

/// Formula text was syntactically invalid and could not be parsed into an AST.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("formula error at offset {pos}: {message}")]
pub struct FormulaException {
    pub message: String,
    pub pos: usize,
}
