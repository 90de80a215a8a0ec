//! Grid coordinates: parsing/formatting of A1-style references and the
//! printable-size computation over a set of positions.
//!
//! # Examples
//!
//! ```ignore
//! let p = Position::parse("B3").unwrap();
//! assert_eq!(p, Position::new(2, 1));
//! assert_eq!(p.format(), "B3");
//! ```

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Exclusive upper bound on row indices a sheet can address.
pub const MAX_ROWS: usize = 16_384;
/// Exclusive upper bound on column indices a sheet can address.
pub const MAX_COLS: usize = 16_384;

/// A zero-indexed grid coordinate. `Ord` follows `(row, col)`, i.e. row-major.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Position {
        Position { row, col }
    }

    /// Whether this position falls inside the fixed `MAX_ROWS` x `MAX_COLS` grid.
    pub fn is_valid(&self) -> bool {
        self.row < MAX_ROWS && self.col < MAX_COLS
    }

    /// Parse spreadsheet notation ("B3", "aa10", ...) into a Position.
    ///
    /// Column letters may be given in either case on input; only uppercase is
    /// ever produced by `format`/`Display`. Out-of-grid coordinates and
    /// malformed text are both rejected here — unlike a cell reference inside
    /// a formula, a position parsed through this entry point has no later
    /// evaluation-time chance to become `#REF!`.
    pub fn parse(text: &str) -> Result<Position, PositionError> {
        let caps = position_re()
            .captures(text)
            .ok_or_else(|| PositionError::Malformed(text.to_string()))?;
        let letters = &caps[1];
        let digits = &caps[2];

        let mut col_acc: usize = 0;
        for b in letters.bytes() {
            let digit = (b.to_ascii_uppercase() - b'A') as usize + 1;
            col_acc = col_acc
                .checked_mul(26)
                .and_then(|v| v.checked_add(digit))
                .ok_or_else(|| PositionError::OutOfRange(text.to_string()))?;
        }
        let col = col_acc - 1;

        let row_num: usize = digits
            .parse()
            .map_err(|_| PositionError::Malformed(text.to_string()))?;
        let row = row_num
            .checked_sub(1)
            .ok_or_else(|| PositionError::Malformed(text.to_string()))?;

        let pos = Position::new(row, col);
        if !pos.is_valid() {
            return Err(PositionError::OutOfRange(text.to_string()));
        }
        Ok(pos)
    }

    /// Canonical uppercase `LETTERS` + 1-based `DIGITS` form. Total over valid
    /// positions (and well-defined, if never produced by `parse`, for invalid
    /// ones too — useful for error messages).
    pub fn format(&self) -> String {
        format!("{}{}", Self::col_letters(self.col), self.row + 1)
    }

    fn col_letters(col: usize) -> String {
        let mut n = col as u128 + 1;
        let mut letters = Vec::new();
        while n > 0 {
            n -= 1;
            letters.push(b'A' + (n % 26) as u8);
            n /= 26;
        }
        letters.reverse();
        String::from_utf8(letters).expect("column letters are always ASCII")
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

fn position_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z]+)([0-9]+)$").expect("position regex must compile")
    })
}

/// Failure parsing spreadsheet-notation text into a `Position`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("'{0}' is not a cell reference")]
    Malformed(String),
    #[error("'{0}' is outside the grid")]
    OutOfRange(String),
}

/// The smallest rectangle, anchored at (0,0), enclosing a set of positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub rows: usize,
    pub cols: usize,
}

impl Size {
    /// (0, 0) for an empty iterator, otherwise `(1 + max row, 1 + max col)`.
    pub fn printable_from<I: IntoIterator<Item = Position>>(positions: I) -> Size {
        let mut max_row = None;
        let mut max_col = None;
        for p in positions {
            max_row = Some(max_row.map_or(p.row, |m: usize| m.max(p.row)));
            max_col = Some(max_col.map_or(p.col, |m: usize| m.max(p.col)));
        }
        match (max_row, max_col) {
            (Some(rows), Some(cols)) => Size {
                rows: rows + 1,
                cols: cols + 1,
            },
            _ => Size::default(),
        }
    }
}
