//! Formula evaluation and reference extraction.
//!
//! `evaluate` takes the sheet as an explicit parameter (`&dyn CellLookup`)
//! rather than having cells hold a back-reference to their owning sheet.

use std::collections::BTreeSet;

use crate::position::Position;
use crate::value::{CellError, Value};
use crate::CellLookup;

use super::ast::{Ast, BinaryOp, UnaryOp};

/// Evaluate `ast` against `lookup`, which resolves `Ref` nodes to the
/// referenced cell's contribution (see `CellLookup`).
pub fn evaluate(ast: &Ast, lookup: &dyn CellLookup) -> Value {
    match ast {
        Ast::Num(n) => Value::Number(*n),
        Ast::Ref(pos) => resolve_ref(*pos, lookup),
        Ast::Unary(op, child) => match as_number(evaluate(child, lookup)) {
            Err(e) => Value::Error(e),
            Ok(n) => Value::Number(match op {
                UnaryOp::Plus => n,
                UnaryOp::Minus => -n,
            }),
        },
        Ast::Binary(op, left, right) => {
            // Both sides are evaluated unconditionally (there are no side
            // effects to avoid); the left error still wins when both error,
            // matching left-before-right propagation.
            let lv = as_number(evaluate(left, lookup));
            let rv = as_number(evaluate(right, lookup));
            match (lv, rv) {
                (Err(e), _) => Value::Error(e),
                (_, Err(e)) => Value::Error(e),
                (Ok(l), Ok(r)) => apply_binary(*op, l, r),
            }
        }
    }
}

fn resolve_ref(pos: Position, lookup: &dyn CellLookup) -> Value {
    if !pos.is_valid() {
        return Value::Error(CellError::Ref);
    }
    lookup.resolve(pos)
}

/// Any value reachable through `evaluate` is already a `Number` or an
/// `Error` — reference resolution converts text to a number or `#VALUE!`
/// before it ever reaches arithmetic. The `Text` arm only guards against that
/// invariant being violated by a future `CellLookup` implementation.
fn as_number(v: Value) -> Result<f64, CellError> {
    match v {
        Value::Number(n) => Ok(n),
        Value::Error(e) => Err(e),
        Value::Text(_) => Err(CellError::Value),
    }
}

fn apply_binary(op: BinaryOp, l: f64, r: f64) -> Value {
    match op {
        BinaryOp::Add => finite(l + r),
        BinaryOp::Sub => finite(l - r),
        BinaryOp::Mul => finite(l * r),
        BinaryOp::Div => {
            if r == 0.0 {
                Value::Error(CellError::Div0)
            } else {
                finite(l / r)
            }
        }
    }
}

fn finite(n: f64) -> Value {
    if n.is_finite() {
        Value::Number(n)
    } else {
        Value::Error(CellError::Div0)
    }
}

/// Distinct positions referenced by `ast`, sorted in row-major order.
pub fn referenced_cells(ast: &Ast) -> Vec<Position> {
    let mut set = BTreeSet::new();
    collect(ast, &mut set);
    set.into_iter().collect()
}

fn collect(ast: &Ast, set: &mut BTreeSet<Position>) {
    match ast {
        Ast::Num(_) => {}
        Ast::Ref(p) => {
            set.insert(*p);
        }
        Ast::Unary(_, child) => collect(child, set),
        Ast::Binary(_, left, right) => {
            collect(left, set);
            collect(right, set);
        }
    }
}
