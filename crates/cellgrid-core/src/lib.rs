//! The sheet: a sparse grid of cells kept consistent with its dependency
//! graph across edits.

pub mod error;
pub mod sheet;

pub use error::SheetError;
pub use sheet::Sheet;

pub use cellgrid_engine::{
    cell::CellContents, value::CellError, Cell, CellLookup, Position, PositionError, Size, Value,
    MAX_COLS, MAX_ROWS,
};
