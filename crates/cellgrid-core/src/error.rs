//! Edit-time errors a sheet operation can fail with.

use cellgrid_engine::{FormulaException, Position, PositionError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetError {
    #[error("invalid position: {0}")]
    InvalidPosition(#[from] PositionError),

    #[error("formula error: {0}")]
    Formula(#[from] FormulaException),

    #[error("setting {pos} would create a circular dependency")]
    CircularDependency { pos: Position },
}
