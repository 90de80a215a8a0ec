//! End-to-end coverage of the sheet's documented invariants and worked
//! scenarios, each starting from a freshly created empty sheet.

use cellgrid_core::{CellError, Sheet, SheetError, Value};
use cellgrid_engine::Position;

fn pos(text: &str) -> Position {
    Position::parse(text).unwrap()
}

#[test]
fn scenario_literal_text() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "hello").unwrap();
    assert_eq!(sheet.get_text(pos("A1")), "hello");
    assert_eq!(sheet.get_value(pos("A1")), Value::Text("hello".to_string()));
    assert_eq!(sheet.printable_size(), cellgrid_core::Size { rows: 1, cols: 1 });
}

#[test]
fn scenario_escaped_text() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "'=1+2").unwrap();
    assert_eq!(sheet.get_text(pos("A1")), "'=1+2");
    assert_eq!(sheet.get_value(pos("A1")), Value::Text("=1+2".to_string()));
}

#[test]
fn scenario_formula_with_auto_vivification() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=B1+C1").unwrap();
    sheet.set_cell(pos("B1"), "3").unwrap();
    sheet.set_cell(pos("C1"), "4").unwrap();
    assert_eq!(sheet.get_value(pos("A1")), Value::Number(7.0));
    assert_eq!(sheet.get_text(pos("A1")), "=B1+C1");
    assert_eq!(
        sheet.printable_size(),
        cellgrid_engine::Size { rows: 1, cols: 3 }
    );
}

#[test]
fn scenario_normalization() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "= 2 *( 3 + 4 ) ").unwrap();
    assert_eq!(sheet.get_text(pos("A1")), "=2*(3+4)");
    assert_eq!(sheet.get_value(pos("A1")), Value::Number(14.0));
}

#[test]
fn scenario_cycle_rejection() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=B1").unwrap();
    sheet.set_cell(pos("B1"), "=C1").unwrap();
    let err = sheet.set_cell(pos("C1"), "=A1").unwrap_err();
    assert_eq!(err, SheetError::CircularDependency { pos: pos("C1") });
    assert_eq!(sheet.get_value(pos("A1")), Value::Number(0.0));
}

#[test]
fn scenario_error_propagation() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=1/0").unwrap();
    sheet.set_cell(pos("A2"), "=A1+1").unwrap();
    assert_eq!(sheet.get_value(pos("A1")), Value::Error(CellError::Div0));
    assert_eq!(sheet.get_value(pos("A2")), Value::Error(CellError::Div0));
    sheet.set_cell(pos("A1"), "5").unwrap();
    assert_eq!(sheet.get_value(pos("A2")), Value::Number(6.0));
}

#[test]
fn scenario_text_as_number_coercion() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "3.5").unwrap();
    sheet.set_cell(pos("A2"), "=A1*2").unwrap();
    assert_eq!(sheet.get_value(pos("A2")), Value::Number(7.0));
    sheet.set_cell(pos("A1"), "abc").unwrap();
    assert_eq!(sheet.get_value(pos("A2")), Value::Error(CellError::Value));
}

#[test]
fn scenario_clear() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "1").unwrap();
    sheet.set_cell(pos("B1"), "=A1").unwrap();
    sheet.clear_cell(pos("A1")).unwrap();
    assert_eq!(sheet.get_value(pos("B1")), Value::Number(0.0));
    assert_eq!(
        sheet.printable_size(),
        cellgrid_engine::Size { rows: 1, cols: 2 }
    );
}

/// P1: `parse(format(p)) == p` for every position.
#[test]
fn property_position_roundtrips() {
    for p in [
        Position::new(0, 0),
        Position::new(2, 1),
        Position::new(0, 26),
        Position::new(16_383, 16_383),
    ] {
        assert_eq!(Position::parse(&p.format()).unwrap(), p);
    }
}

/// P2: formula normalization is idempotent through `GetText`.
#[test]
fn property_normalization_is_idempotent() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=1-(2-3)").unwrap();
    let once = sheet.get_text(pos("A1"));
    sheet.set_cell(pos("A2"), &once).unwrap();
    assert_eq!(sheet.get_text(pos("A2")), once);
}

/// P3: after any successful mutation the dependency graph stays acyclic —
/// exercised indirectly, since a cyclic edit is always rejected (scenario 5
/// and the unit tests in `sheet.rs` cover direct/indirect cases).
#[test]
fn property_successful_edits_never_introduce_a_cycle() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=B1").unwrap();
    sheet.set_cell(pos("B1"), "=C1").unwrap();
    sheet.set_cell(pos("C1"), "1").unwrap();
    assert_eq!(sheet.get_value(pos("A1")), Value::Number(1.0));
}

/// P4: repeated reads with no intervening mutation are stable.
#[test]
fn property_repeated_reads_are_stable() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "1").unwrap();
    sheet.set_cell(pos("A2"), "=A1+1").unwrap();
    let first = sheet.get_value(pos("A2"));
    let second = sheet.get_value(pos("A2"));
    assert_eq!(first, second);
}

/// P5: a rejected `set_cell` leaves the target cell and printable size untouched.
#[test]
fn property_rejected_set_cell_leaves_cell_and_size_unchanged() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "1").unwrap();
    let size_before = sheet.printable_size();
    let text_before = sheet.get_text(pos("A1"));
    assert!(sheet.set_cell(pos("A1"), "=A1").is_err());
    assert_eq!(sheet.get_text(pos("A1")), text_before);
    assert_eq!(sheet.printable_size(), size_before);
}

/// P6: printable size is exactly `(1 + max row, 1 + max col)` over non-empty cells.
#[test]
fn property_printable_size_matches_non_empty_bounding_box() {
    let mut sheet = Sheet::new();
    assert_eq!(sheet.printable_size(), cellgrid_engine::Size::default());
    sheet.set_cell(pos("F4"), "x").unwrap();
    assert_eq!(
        sheet.printable_size(),
        cellgrid_engine::Size { rows: 4, cols: 6 }
    );
}

/// P7: in `A + B` where both are errors, the observed error is A's.
#[test]
fn property_left_error_wins_in_addition() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=1/0").unwrap();
    sheet.set_cell(pos("B1"), "=ZZZZ99999999").unwrap();
    sheet.set_cell(pos("C1"), "=A1+B1").unwrap();
    assert_eq!(sheet.get_value(pos("C1")), Value::Error(CellError::Div0));
}
