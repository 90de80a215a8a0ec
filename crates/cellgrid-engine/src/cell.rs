//! A single cell's contents and its memoized evaluated value.

use std::cell::RefCell;

use crate::formula::{self, Ast};
use crate::value::{CellError, Value};
use crate::CellLookup;

/// What a cell actually holds, independent of its evaluated value.
#[derive(Clone, Debug, PartialEq)]
pub enum CellContents {
    Empty,
    /// Raw text, verbatim. A single leading apostrophe is the escape marker
    /// that keeps a literal `=` (or anything else) from being parsed as a
    /// formula; it is stripped only from the *value*, never from the text.
    Text(String),
    Formula { source: String, ast: Ast },
}

/// A cell: its contents plus a lazily-populated cache of the last formula
/// evaluation.
///
/// The cache is `None` whenever it is stale — there is no separate dirty
/// flag, `None` *is* the dirty state — and is only ever read or written
/// through `get_value`/`invalidate`. Only `Formula` cells ever populate it;
/// `Empty`/`Text` values are cheap enough to recompute on every read.
#[derive(Debug)]
pub struct Cell {
    contents: CellContents,
    memo: RefCell<Option<Value>>,
}

impl Cell {
    pub fn empty() -> Cell {
        Cell {
            contents: CellContents::Empty,
            memo: RefCell::new(None),
        }
    }

    pub fn text(text: String) -> Cell {
        Cell {
            contents: CellContents::Text(text),
            memo: RefCell::new(None),
        }
    }

    pub fn formula(source: String, ast: Ast) -> Cell {
        Cell {
            contents: CellContents::Formula { source, ast },
            memo: RefCell::new(None),
        }
    }

    pub fn contents(&self) -> &CellContents {
        &self.contents
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.contents, CellContents::Empty)
    }

    /// The text a user would see editing this cell: the literal text for
    /// `Text` (escape apostrophe included, if any), or `=` followed by the
    /// canonical, re-parenthesized formula text for `Formula`.
    pub fn get_text(&self) -> String {
        match &self.contents {
            CellContents::Empty => String::new(),
            CellContents::Text(s) => s.clone(),
            CellContents::Formula { ast, .. } => format!("={}", formula::print_ast(ast)),
        }
    }

    /// This cell's value as seen through the public API: `""` for `Empty`,
    /// the text with its escape apostrophe stripped for `Text`, or the
    /// evaluated (and memoized) result for `Formula`.
    ///
    /// This is distinct from how the value is *used when referenced* by
    /// another formula — see `resolve_as_reference`, which additionally
    /// coerces `Empty`/`Text` to a number.
    pub fn get_value(&self, lookup: &dyn CellLookup) -> Value {
        match &self.contents {
            CellContents::Empty => Value::Text(String::new()),
            CellContents::Text(s) => Value::Text(strip_escape(s).to_string()),
            CellContents::Formula { .. } => self.evaluate_formula(lookup),
        }
    }

    /// The value this cell contributes when another formula references it:
    /// `Empty` and absent cells read as `0.0`, `Text` coerces to a number or
    /// `#VALUE!`, and a `Formula`'s evaluated value (itself a number or an
    /// error) passes through unchanged.
    pub fn resolve_as_reference(&self, lookup: &dyn CellLookup) -> Value {
        match &self.contents {
            CellContents::Empty => Value::Number(0.0),
            CellContents::Text(s) => match formula::parse_number_literal(strip_escape(s)) {
                Some(n) => Value::Number(n),
                None => Value::Error(CellError::Value),
            },
            CellContents::Formula { .. } => self.evaluate_formula(lookup),
        }
    }

    fn evaluate_formula(&self, lookup: &dyn CellLookup) -> Value {
        let CellContents::Formula { ast, .. } = &self.contents else {
            unreachable!("evaluate_formula is only called for Formula cells");
        };
        if let Some(cached) = self.memo.borrow().as_ref() {
            return cached.clone();
        }
        let value = formula::evaluate(ast, lookup);
        *self.memo.borrow_mut() = Some(value.clone());
        value
    }

    /// Drop the cached value so the next `get_value`/`resolve_as_reference`
    /// recomputes it. A no-op for non-`Formula` cells, which never cache.
    pub fn invalidate(&self) {
        *self.memo.borrow_mut() = None;
    }

    /// Positions this cell's formula (if any) depends on.
    pub fn references(&self) -> Vec<crate::position::Position> {
        match &self.contents {
            CellContents::Formula { ast, .. } => formula::referenced_cells(ast),
            _ => Vec::new(),
        }
    }
}

/// Strip exactly one leading apostrophe, the text-escape marker.
fn strip_escape(s: &str) -> &str {
    s.strip_prefix('\'').unwrap_or(s)
}
