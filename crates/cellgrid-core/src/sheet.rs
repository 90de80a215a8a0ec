//! The sparse grid of cells, its dependency graph, and the operations that
//! keep the two consistent: `set_cell` and `clear_cell`.

use std::collections::{HashMap, HashSet};

use cellgrid_engine::{formula, Cell, CellLookup, Position, PositionError, Size, Value};

use crate::error::SheetError;

/// A sparse, lazily-evaluated 2D grid of cells.
///
/// Only occupied cells are stored in `cells`; reading an absent position
/// behaves exactly as reading an `Empty` cell would. `dependents` is the
/// *reverse* dependency index: `dependents[p]` is the set of cells whose
/// formula references `p`, used to push invalidation out to everything
/// downstream of an edit without re-deriving it from scratch each time.
#[derive(Default)]
pub struct Sheet {
    cells: HashMap<Position, Cell>,
    dependents: HashMap<Position, HashSet<Position>>,
}

impl Sheet {
    pub fn new() -> Sheet {
        Sheet {
            cells: HashMap::new(),
            dependents: HashMap::new(),
        }
    }

    /// Set `pos`'s contents from raw edit text: empty text clears the cell,
    /// text beginning with `=` and at least one more character starts a
    /// formula, anything else is stored verbatim as `Text` (including a
    /// leading escape apostrophe, if present).
    ///
    /// The whole operation is transactional: the new contents are parsed and
    /// checked for a cycle *before* anything is mutated, so a rejected edit
    /// leaves the sheet exactly as it was.
    #[tracing::instrument(level = "debug", skip(self, pos, text), fields(pos = %pos))]
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<(), SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition(PositionError::OutOfRange(
                pos.format(),
            )));
        }

        if text.is_empty() {
            return self.clear_cell(pos);
        }

        let new_cell = if text.len() > 1 {
            if let Some(rest) = text.strip_prefix('=') {
                let ast = formula::parse(rest)?;
                Cell::formula(rest.to_string(), ast)
            } else {
                Cell::text(text.to_string())
            }
        } else {
            Cell::text(text.to_string())
        };

        let new_refs: Vec<Position> = new_cell
            .references()
            .into_iter()
            .filter(Position::is_valid)
            .collect();

        if self.would_create_cycle(pos, &new_refs) {
            tracing::warn!(%pos, "rejected edit: would close a circular dependency");
            return Err(SheetError::CircularDependency { pos });
        }

        let old_refs = self
            .cells
            .get(&pos)
            .map(|c| c.references())
            .unwrap_or_default();
        for r in &old_refs {
            if let Some(set) = self.dependents.get_mut(r) {
                set.remove(&pos);
            }
        }

        for r in &new_refs {
            self.dependents.entry(*r).or_default().insert(pos);
            // A reference to a position with no stored cell behaves as an
            // empty cell already; vivify it so its home is well-defined
            // before anything is ever written there.
            self.cells.entry(*r).or_insert_with(Cell::empty);
        }

        self.cells.insert(pos, new_cell);
        self.invalidate_dependents(pos);
        tracing::debug!(%pos, references = new_refs.len(), "cell set");
        Ok(())
    }

    /// Remove `pos`'s contents entirely. Cells that depend on `pos` keep
    /// their forward reference (it now resolves to an implicit empty cell)
    /// and are invalidated so they re-evaluate against that new value.
    #[tracing::instrument(level = "debug", skip(self, pos), fields(pos = %pos))]
    pub fn clear_cell(&mut self, pos: Position) -> Result<(), SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition(PositionError::OutOfRange(
                pos.format(),
            )));
        }

        let old_refs = self
            .cells
            .get(&pos)
            .map(|c| c.references())
            .unwrap_or_default();
        for r in &old_refs {
            if let Some(set) = self.dependents.get_mut(r) {
                set.remove(&pos);
            }
        }
        self.cells.remove(&pos);
        self.invalidate_dependents(pos);
        Ok(())
    }

    /// Whether resolving `pos`'s references through the existing graph could
    /// ever reach `pos` again, i.e. whether adding `new_refs` as `pos`'s
    /// outgoing edges would close a cycle. Existing cells' own forward
    /// references are read from their current contents; `pos`'s own
    /// (not-yet-committed) contents are never expanded, since that's exactly
    /// the edge under test.
    fn would_create_cycle(&self, pos: Position, new_refs: &[Position]) -> bool {
        let mut visited = HashSet::new();
        let mut stack: Vec<Position> = new_refs.to_vec();
        while let Some(cur) = stack.pop() {
            if cur == pos {
                return true;
            }
            if !visited.insert(cur) {
                continue;
            }
            if let Some(cell) = self.cells.get(&cur) {
                stack.extend(cell.references());
            }
        }
        false
    }

    /// Breadth-first walk of everything downstream of `pos`, dropping each
    /// cell's memoized value so it recomputes on next read.
    fn invalidate_dependents(&mut self, pos: Position) {
        let mut queue: Vec<Position> = self
            .dependents
            .get(&pos)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        let mut visited = HashSet::new();
        while let Some(cur) = queue.pop() {
            if !visited.insert(cur) {
                continue;
            }
            if let Some(cell) = self.cells.get(&cur) {
                cell.invalidate();
            }
            if let Some(next) = self.dependents.get(&cur) {
                queue.extend(next.iter().copied());
            }
        }
    }

    /// `pos`'s value through the public API: `""` for an absent or `Empty`
    /// cell, the escape-stripped text for `Text`, or the evaluated result
    /// for `Formula`. This is *not* the value used when another formula
    /// references `pos` — see the `CellLookup` impl below.
    pub fn get_value(&self, pos: Position) -> Value {
        match self.cells.get(&pos) {
            Some(cell) => cell.get_value(self),
            None => Value::Text(String::new()),
        }
    }

    /// The text a user would see editing `pos` — empty for an unoccupied
    /// position.
    pub fn get_text(&self, pos: Position) -> String {
        self.cells.get(&pos).map(Cell::get_text).unwrap_or_default()
    }

    /// The cell stored at `pos`, or `None` if `pos` is unoccupied.
    pub fn get_cell(&self, pos: Position) -> Result<Option<&Cell>, SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition(PositionError::OutOfRange(
                pos.format(),
            )));
        }
        Ok(self.cells.get(&pos))
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.cells.get(&pos).is_some_and(|c| !c.is_empty())
    }

    /// All occupied positions (non-empty contents), unordered.
    pub fn occupied_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(pos, _)| *pos)
    }

    /// The smallest rectangle, anchored at (0,0), that covers every occupied cell.
    pub fn printable_size(&self) -> Size {
        Size::printable_from(self.occupied_positions())
    }
}

impl CellLookup for Sheet {
    /// Resolves a formula's reference to `pos`: absent and `Empty` cells
    /// read as `0.0`, `Text` coerces to a number or `#VALUE!`, `Formula`
    /// passes its own evaluated value through.
    fn resolve(&self, pos: Position) -> Value {
        match self.cells.get(&pos) {
            Some(cell) => cell.resolve_as_reference(self),
            None => Value::Number(0.0),
        }
    }
}
